use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// PingOne geographic region, identified by the top-level domain suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "com")]
    NorthAmerica,
    #[serde(rename = "eu")]
    Europe,
    #[serde(rename = "ca")]
    Canada,
    #[serde(rename = "asia")]
    Asia,
    #[serde(rename = "com.au")]
    Australia,
    #[serde(rename = "sg")]
    Singapore,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::NorthAmerica,
        Region::Europe,
        Region::Canada,
        Region::Asia,
        Region::Australia,
        Region::Singapore,
    ];

    /// Domain suffix used to build auth and API hosts
    pub fn suffix(&self) -> &'static str {
        match self {
            Region::NorthAmerica => "com",
            Region::Europe => "eu",
            Region::Canada => "ca",
            Region::Asia => "asia",
            Region::Australia => "com.au",
            Region::Singapore => "sg",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .iter()
            .copied()
            .find(|region| region.suffix() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Region::ALL.iter().map(|r| r.suffix()).collect();
                format!("unknown region '{}' (expected one of: {})", s, valid.join(", "))
            })
    }
}

/// Connection parameters for one PingOne environment
#[derive(Clone, PartialEq, Eq)]
pub struct EnvironmentCredential {
    /// Display label shown to the operator and used in error messages
    pub name: String,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub region: Region,
}

impl EnvironmentCredential {
    /// Key under which this credential's token is cached.
    /// The display name is deliberately not part of it.
    pub fn cache_key(&self) -> TokenCacheKey {
        TokenCacheKey {
            tenant_id: self.tenant_id.clone(),
            client_id: self.client_id.clone(),
        }
    }
}

// Keep the secret out of debug output and logs
impl fmt::Debug for EnvironmentCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentCredential")
            .field("name", &self.name)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("region", &self.region)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenCacheKey {
    pub tenant_id: String,
    pub client_id: String,
}

/// Cached bearer token for a `(tenant_id, client_id)` pair
#[derive(Clone)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at_millis: i64,
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &"***")
            .field("expires_at_millis", &self.expires_at_millis)
            .finish()
    }
}

/// Token endpoint response body
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Summary of a remote form as returned by the collection endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One page of the HAL-style forms collection
#[derive(Debug, Deserialize)]
pub struct FormsPage {
    #[serde(rename = "_embedded", default)]
    pub embedded: EmbeddedForms,
    #[serde(rename = "_links", default)]
    pub links: PageLinks,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmbeddedForms {
    #[serde(default)]
    pub forms: Vec<FormSummary>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub next: Option<Link>,
}

#[derive(Debug, Deserialize)]
pub struct Link {
    pub href: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_region_parse() {
        assert_eq!("com.au".parse::<Region>().unwrap(), Region::Australia);
        assert_eq!("eu".parse::<Region>().unwrap(), Region::Europe);
        let err = "us".parse::<Region>().unwrap_err();
        assert!(err.contains("unknown region 'us'"));
        assert!(err.contains("com.au"));
    }

    #[test]
    fn test_cache_key_ignores_display_name() {
        let a = EnvironmentCredential {
            name: "Dev".to_string(),
            tenant_id: "t".to_string(),
            client_id: "c".to_string(),
            client_secret: "s".to_string(),
            region: Region::Europe,
        };
        let b = EnvironmentCredential {
            name: "Development (copy)".to_string(),
            ..a.clone()
        };
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_debug_hides_secret() {
        let credential = EnvironmentCredential {
            name: "Dev".to_string(),
            tenant_id: "t".to_string(),
            client_id: "c".to_string(),
            client_secret: "s3cret".to_string(),
            region: Region::Canada,
        };
        assert!(!format!("{:?}", credential).contains("s3cret"));
    }

    #[test]
    fn test_forms_page_without_next_link() {
        let page: FormsPage = serde_json::from_value(json!({
            "_embedded": { "forms": [ { "id": "f-1", "name": "Login" } ] },
            "_links": { "self": { "href": "https://api.pingone.eu/v1/x" } }
        }))
        .unwrap();

        assert_eq!(page.embedded.forms.len(), 1);
        assert_eq!(page.embedded.forms[0].description, None);
        assert!(page.links.next.is_none());
    }

    #[test]
    fn test_forms_page_empty_body() {
        let page: FormsPage = serde_json::from_value(json!({})).unwrap();
        assert!(page.embedded.forms.is_empty());
    }
}
