use serde::{Deserialize, Deserializer};

/// Treats `""` (and whitespace-only strings) as an absent value.
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.trim().is_empty()))
}

/// Splits a comma separated string into trimmed, non-empty items.
pub fn split_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        faculty: Option<String>,
    }

    #[test]
    fn test_empty_string_becomes_none() {
        let probe: Probe = serde_json::from_str(r#"{"faculty":"  "}"#).unwrap();
        assert!(probe.faculty.is_none());

        let probe: Probe = serde_json::from_str(r#"{"faculty":"Engineering"}"#).unwrap();
        assert_eq!(probe.faculty.as_deref(), Some("Engineering"));

        let probe: Probe = serde_json::from_str(r#"{}"#).unwrap();
        assert!(probe.faculty.is_none());
    }

    #[test]
    fn test_split_comma_list() {
        assert_eq!(
            split_comma_list("Facebook, Instagram,,TikTok "),
            vec!["Facebook", "Instagram", "TikTok"]
        );
        assert!(split_comma_list("").is_empty());
    }
}
