use lazy_static::lazy_static;
use mongodb::bson::oid::ObjectId;
use regex::{Captures, Regex};
use serde::{Deserialize, Deserializer};
use std::{
    collections::HashMap,
    time::{SystemTime, UNIX_EPOCH},
};

lazy_static! {
    static ref PLACEHOLDER_RE: Regex =
        Regex::new(r"\{\{(\w+)\}\}").expect("placeholder pattern should compile");
}

/// Seconds since the UNIX epoch, used for persisted timestamps
pub fn get_epoch_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is set before the UNIX epoch")
        .as_secs()
}

/// replace placeholder variables from the template text
/// placeholders are of pattern {{variable}}
/// unknown placeholders are left in place
pub fn replace_placeholders(template: &str, values: &HashMap<String, String>) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            let var = &caps[1];
            match values.get(var) {
                Some(val) => val.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Deserialize helper mapping an optional ObjectId _id to its hex string
pub fn deserialize_helper<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let oid = Option::<ObjectId>::deserialize(deserializer)?;
    Ok(oid.map(|oid| oid.to_hex()))
}

#[cfg(test)]
mod tests {
    use std::{thread, time::Duration};

    use super::*;

    #[test]
    fn test_get_epoch_ts_advances() {
        let t1 = get_epoch_ts();
        thread::sleep(Duration::from_secs(1));
        let t2 = get_epoch_ts();
        assert!(t1 > 1_700_000_000);
        assert!(t2 >= t1 + 1);
    }

    #[test]
    fn test_replace_placeholders() {
        let mut values = HashMap::new();
        values.insert("clientName".to_owned(), "Priya".to_owned());
        values.insert("salonName".to_owned(), "Shear Bliss".to_owned());
        let result = replace_placeholders("Hi {{clientName}}, see you at {{salonName}}.", &values);
        assert_eq!(result, "Hi Priya, see you at Shear Bliss.");
    }

    #[test]
    fn test_replace_placeholders_unknown_kept() {
        let values = HashMap::new();
        let result = replace_placeholders("Hi {{clientName}}!", &values);
        assert_eq!(result, "Hi {{clientName}}!");
    }

    #[test]
    fn test_replace_placeholders_repeated_var() {
        let mut values = HashMap::new();
        values.insert("time".to_owned(), "10:30".to_owned());
        let result = replace_placeholders("{{time}} means {{time}} sharp", &values);
        assert_eq!(result, "10:30 means 10:30 sharp");
    }
}
