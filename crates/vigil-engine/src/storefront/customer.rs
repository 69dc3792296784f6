use rand::Rng;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// A storefront customer account.
#[derive(Clone, PartialEq)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl Customer {
    /// A fresh customer with an email no previous run has used.
    pub fn generate(password: &str) -> Self {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..3)
            .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
            .collect();
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        Self {
            first_name: format!("TestFN{}", suffix),
            last_name: format!("TestLN{}", suffix),
            email: format!(
                "testuser_{}_{}{}@example.com",
                millis,
                suffix.to_lowercase(),
                rng.gen_range(1000..10000)
            ),
            password: password.to_string(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Debug for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Customer")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"******")
            .finish()
    }
}
