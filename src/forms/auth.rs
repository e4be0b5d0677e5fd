use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::auth::{Credentials, Registration};
use crate::forms::FormError;

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(skip_serializing)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl TryFrom<LoginForm> for Credentials {
    type Error = FormError;

    fn try_from(form: LoginForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Credentials {
            email: form.email.trim().to_lowercase(),
            password: form.password,
        })
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(skip_serializing)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(skip_serializing)]
    pub confirm_password: String,
}

impl TryFrom<RegisterForm> for Registration {
    type Error = FormError;

    fn try_from(form: RegisterForm) -> Result<Self, Self::Error> {
        form.validate()?;
        if form.password != form.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        Ok(Registration {
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            email: form.email.trim().to_lowercase(),
            password: form.password,
        })
    }
}
