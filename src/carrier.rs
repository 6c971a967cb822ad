use std::collections::BTreeMap;
use std::collections::HashMap;


/// Interface for HTTP header and text map carriers.
///
/// Used by `propagation::extract` to read inbound B3 headers and by
/// `propagation::inject` to write outbound ones.
pub trait MapCarrier {
    /// List all items stored in the carrier as `(key, value)` pairs.
    fn items(&self) -> Vec<(&String, &String)>;

    /// Attempt to fetch an exact key from the carrier.
    fn get(&self, key: &str) -> Option<String>;

    /// Set a key/value pair on the carrier.
    fn set(&mut self, key: &str, value: &str);

    /// Attempt to fetch a key ignoring ASCII case.
    ///
    /// HTTP header names are case insensitive but carriers store them as sent.
    fn get_ignore_case(&self, key: &str) -> Option<String> {
        self.get(key).or_else(|| {
            self.items().into_iter()
                .find(|&(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.clone())
        })
    }
}

impl MapCarrier for HashMap<String, String> {
    fn items(&self) -> Vec<(&String, &String)> {
        self.iter().collect()
    }

    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.insert(String::from(key), String::from(value));
    }
}

impl MapCarrier for BTreeMap<String, String> {
    fn items(&self) -> Vec<(&String, &String)> {
        self.iter().collect()
    }

    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.insert(String::from(key), String::from(value));
    }
}
