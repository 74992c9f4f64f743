pub mod activity;
pub mod error;
pub mod events;

pub mod settings {
    use serde::{Deserialize, Serialize};

    fn default_base_url() -> String {
        "http://127.0.0.1:8000/".to_string()
    }

    fn default_storage_api() -> u32 {
        34
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AppSettings {
        /// Base URL of the chat backend. A trailing slash is normalized on save.
        #[serde(default = "default_base_url")]
        pub base_url: String,
        /// Serve canned answers instead of calling the network.
        #[serde(default)]
        pub mock_mode: bool,
        /// Directory the file browser opens in. Defaults to the home directory.
        #[serde(default)]
        pub browse_root: Option<String>,
        /// Storage API generation consulted by the permission capability table.
        #[serde(default = "default_storage_api")]
        pub storage_api: u32,
    }

    impl Default for AppSettings {
        fn default() -> Self {
            Self {
                base_url: default_base_url(),
                mock_mode: false,
                browse_root: None,
                storage_api: default_storage_api(),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn missing_fields_fall_back_to_defaults() {
            let settings: AppSettings = serde_json::from_str("{}").unwrap();
            assert_eq!(settings.base_url, "http://127.0.0.1:8000/");
            assert!(!settings.mock_mode);
            assert_eq!(settings.storage_api, 34);
        }
    }
}
