//! Test helpers for the Jira API

#[cfg(test)]
pub fn create_test_client(url: &str) -> super::Client {
    let config = super::ClientConfig {
        max_retries: 0,
        ..Default::default()
    };
    super::Client::with_config(url, "admin@example.com", "test-token", config).unwrap()
}
