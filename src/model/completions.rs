//! Code-completion results returned by the session's completion RPC.
//!
//! The wire format carries a few quirks from the session side: `token` and
//! `fguess` arrive as one-element arrays, and `packages` as an array of
//! nullable one-element arrays. The deserializers below flatten those so
//! callers see plain strings.

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Deserialize)]
pub struct Completions {
    /// The token the completions apply to.
    #[serde(deserialize_with = "first_element")]
    pub token: String,
    /// Candidate completions, in ranked order.
    #[serde(rename = "results")]
    pub completions: Vec<String>,
    /// Originating package per candidate, when known. Parallel to
    /// `completions`.
    #[serde(default, deserialize_with = "flatten_singletons")]
    pub packages: Vec<Option<String>>,
    /// If the session thinks the cursor is inside a call's argument list,
    /// the name of that function.
    #[serde(default, rename = "fguess", deserialize_with = "optional_first_element")]
    pub guessed_function: Option<String>,
}

fn first_element<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<String>::deserialize(deserializer)?;
    values
        .into_iter()
        .next()
        .ok_or_else(|| serde::de::Error::custom("expected a non-empty array"))
}

fn optional_first_element<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<String>>::deserialize(deserializer)?;
    Ok(values.and_then(|v| v.into_iter().next()))
}

// packages: [["base"], null, null, ["graphics"], null] => ["base", None, None, "graphics", None]
fn flatten_singletons<'de, D>(deserializer: D) -> Result<Vec<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let nested = Vec::<Option<Vec<String>>>::deserialize(deserializer)?;
    Ok(nested
        .into_iter()
        .map(|entry| entry.and_then(|v| v.into_iter().next()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_session_wire_shape() {
        let json = r#"{
            "token": ["pl"],
            "results": ["plot", "plotmath"],
            "packages": [["graphics"], null],
            "fguess": ["print"]
        }"#;
        let c: Completions = serde_json::from_str(json).unwrap();
        assert_eq!(c.token, "pl");
        assert_eq!(c.completions, vec!["plot", "plotmath"]);
        assert_eq!(c.packages, vec![Some("graphics".into()), None]);
        assert_eq!(c.guessed_function.as_deref(), Some("print"));
    }

    #[test]
    fn missing_fguess_and_packages_default_to_empty() {
        let json = r#"{"token": ["x"], "results": []}"#;
        let c: Completions = serde_json::from_str(json).unwrap();
        assert!(c.completions.is_empty());
        assert!(c.packages.is_empty());
        assert!(c.guessed_function.is_none());
    }

    #[test]
    fn empty_token_array_is_an_error() {
        let json = r#"{"token": [], "results": []}"#;
        assert!(serde_json::from_str::<Completions>(json).is_err());
    }
}
