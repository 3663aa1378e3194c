use serde::Serialize;

/// One referred account, as listed for its referrer.
#[derive(Debug, Serialize)]
pub struct ReferredUser {
    pub username: String,
    pub email: String,
}

/// Referral totals for the authenticated caller.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralStatsResponse {
    pub username: String,
    pub total_referrals: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referred_user_exposes_only_username_and_email() {
        let json = serde_json::to_value(ReferredUser {
            username: "bob".into(),
            email: "b@example.com".into(),
        })
        .expect("serialize");
        let obj = json.as_object().expect("object");
        assert_eq!(obj.len(), 2);
        assert!(obj.contains_key("username"));
        assert!(obj.contains_key("email"));
    }

    #[test]
    fn stats_use_camel_case_total() {
        let json = serde_json::to_string(&ReferralStatsResponse {
            username: "alice".into(),
            total_referrals: 3,
        })
        .expect("serialize");
        assert!(json.contains("\"totalReferrals\":3"));
    }
}
