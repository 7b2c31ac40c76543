use serde::{Deserialize, Serialize};

/// Success payload returned by signup and unregister.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandReceipt {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiRejection;

    #[test]
    fn receipt_and_rejection_match_service_payloads() {
        let receipt: CommandReceipt =
            serde_json::from_str(r#"{"message":"Signed up a@b.com for Chess Club"}"#)
                .expect("decode receipt");
        assert_eq!(receipt.message, "Signed up a@b.com for Chess Club");

        let rejection: ApiRejection =
            serde_json::from_str(r#"{"detail":"Already signed up"}"#).expect("decode rejection");
        assert_eq!(rejection.detail.as_deref(), Some("Already signed up"));

        let empty: ApiRejection = serde_json::from_str("{}").expect("decode empty rejection");
        assert!(empty.detail.is_none());
    }
}
