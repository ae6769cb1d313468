use serde::{Deserialize, Serialize};

// Identifiers are minted by the backend; the client never inspects them.
macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

string_id!(VideoId);
string_id!(JobId);
string_id!(ResultId);
string_id!(CaptionId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = VideoId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        let back: JobId = serde_json::from_str("\"j-1\"").unwrap();
        assert_eq!(back.as_str(), "j-1");
        assert_eq!(back.to_string(), "j-1");
    }

    #[test]
    fn health_tolerates_missing_fields() {
        let h: HealthStatus = serde_json::from_str(r#"{"status":"healthy"}"#).unwrap();
        assert_eq!(h.status, "healthy");
        assert_eq!(h.database, None);
    }
}
