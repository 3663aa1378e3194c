use serde::{Deserialize, Serialize};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub referral_code: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for forgot-password.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Request body for reset-password.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

/// Response returned after registration, carrying the fresh referral code.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub referral_code: String,
    pub referral_link: String,
}

/// Response returned after login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub message: String,
}

/// Response returned by forgot-password; the token doubles as the email payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordResponse {
    pub message: String,
    pub reset_token: String,
}

/// Plain confirmation body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_accepts_camel_case_referral_code() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"username":"alice","email":"a@example.com","password":"Abc123$5","referralCode":"k3j9x2mp"}"#,
        )
        .expect("deserialize");
        assert_eq!(req.referral_code.as_deref(), Some("k3j9x2mp"));
    }

    #[test]
    fn register_request_referral_code_is_optional() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"username":"alice","email":"a@example.com","password":"Abc123$5"}"#,
        )
        .expect("deserialize");
        assert!(req.referral_code.is_none());
    }

    #[test]
    fn register_response_uses_camel_case_keys() {
        let json = serde_json::to_string(&RegisterResponse {
            message: "User registered successfully".into(),
            referral_code: "k3j9x2mp".into(),
            referral_link: "http://localhost:3000/register?referral=k3j9x2mp".into(),
        })
        .expect("serialize");
        assert!(json.contains("\"referralCode\""));
        assert!(json.contains("\"referralLink\""));
    }

    #[test]
    fn reset_request_uses_camel_case_new_password() {
        let req: ResetPasswordRequest =
            serde_json::from_str(r#"{"token":"t","newPassword":"Abc123$5"}"#).expect("deserialize");
        assert_eq!(req.new_password, "Abc123$5");
    }

    #[test]
    fn forgot_response_uses_camel_case_reset_token() {
        let json = serde_json::to_string(&ForgotPasswordResponse {
            message: "Use this token to reset your password".into(),
            reset_token: "abc".into(),
        })
        .expect("serialize");
        assert!(json.contains("\"resetToken\""));
    }
}
