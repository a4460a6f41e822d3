#![allow(dead_code)]

use std::path::PathBuf;

use kramik_server::{Opts, Server};
use tempfile::TempDir;

/// A test server on a random port with an ephemeral data directory.
pub struct TestServer {
    base_url: String,
    data_dir: PathBuf,
    _temp_dir: TempDir,
}

impl TestServer {
    pub async fn start() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().to_path_buf();

        let server = Server::init(Opts {
            listen: "127.0.0.1:0".to_string(),
            cors_origin: None,
            reuseport: false,
            data_dir: data_dir.clone(),
        })
        .await
        .expect("Failed to start test server");

        let base_url = format!("http://{}", server.addr().expect("Bound address"));
        tokio::spawn(server.run());

        Self {
            base_url,
            data_dir,
            _temp_dir: temp_dir,
        }
    }

    /// Create a driver with its own performer token (an independent
    /// client process, as far as the server can tell).
    pub fn driver(&self, performer_token: &str) -> ShopDriver {
        ShopDriver::new(self.base_url.clone(), performer_token.to_owned())
    }

    /// Seed the users table directly, bypassing the register endpoint.
    /// The only way to obtain an admin account.
    pub fn seed_users(&self, rows: &str) {
        let mut contents = String::from("id,name,surname,age,login,password,admin\n");
        contents.push_str(rows);
        std::fs::write(self.data_dir.join("customers.csv"), contents)
            .expect("Failed to seed users table");
    }

    pub fn products_file(&self) -> PathBuf {
        self.data_dir.join("products.csv")
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join("customers.csv")
    }
}

/// HTTP driver playing the desktop client's role: one reqwest client
/// plus the performer token it appends to every authorized call.
pub struct ShopDriver {
    client: reqwest::Client,
    base_url: String,
    pub performer_token: String,
}

impl ShopDriver {
    fn new(base_url: String, performer_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            performer_token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}{}?performer_token={}",
            self.base_url, path, self.performer_token
        )
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    pub async fn post(&self, path: &str) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .send()
            .await
            .expect("POST request failed")
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Register an account through the API.
    pub async fn register(&self, login: &str, password: &str) -> reqwest::Response {
        self.post_json(
            "/register",
            &serde_json::json!({
                "login": login,
                "password": password,
                "name": "Jan",
                "surname": "Kowalski",
                "age": "30",
                "token": self.performer_token,
            }),
        )
        .await
    }

    /// Log an account in under this driver's performer token.
    pub async fn login(&self, login: &str, password: &str) -> reqwest::Response {
        self.post_json(
            "/login",
            &serde_json::json!({
                "login": login,
                "password": password,
                "token": self.performer_token,
            }),
        )
        .await
    }

    pub async fn add_product(&self, product: &serde_json::Value) -> reqwest::Response {
        self.post_json("/add_product", product).await
    }
}
