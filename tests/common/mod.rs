// tests/common/mod.rs
#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;
use quiz_backend::{
    config::{Config, HashConfig},
    error::{AppError, AppResult},
    models::{
        quiz_result::{NewQuizResult, QuizResult},
        user::{NewUser, User},
    },
    repositories::{QuizResultRepository, UserRepository, user_repository::EMAIL_ALREADY_REGISTERED},
    routes,
    state::AppState,
};
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test_secret_for_integration_tests";
pub const PASSWORD: &str = "password123";

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Drops a user row while leaving its sessions valid.
    pub async fn remove(&self, email: &str) {
        self.users.write().await.retain(|user| user.email != email);
    }

    pub async fn password_hash(&self, email: &str) -> Option<String> {
        self.users
            .read()
            .await
            .iter()
            .find(|user| user.email == email)
            .map(|user| user.password_hash.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        // Same guarantee as the unique index on users.email.
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(AppError::Conflict(EMAIL_ALREADY_REGISTERED.to_string()));
        }

        let user = User {
            id: user.id,
            email: user.email,
            password_hash: user.password_hash,
            full_name: user.full_name,
            created_at: Some(Utc::now()),
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[derive(Default)]
pub struct InMemoryQuizResultRepository {
    results: RwLock<Vec<QuizResult>>,
    fail_inserts: AtomicBool,
}

impl InMemoryQuizResultRepository {
    pub async fn count(&self) -> usize {
        self.results.read().await.len()
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl QuizResultRepository for InMemoryQuizResultRepository {
    async fn insert(&self, result: NewQuizResult) -> AppResult<()> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Persistence(
                "insert or update on table \"quiz_results\" violates foreign key constraint"
                    .to_string(),
            ));
        }

        let mut results = self.results.write().await;
        if results.iter().any(|existing| existing.id == result.id) {
            return Err(AppError::Persistence("duplicate quiz result id".to_string()));
        }

        results.push(QuizResult {
            id: result.id,
            user_id: result.user_id,
            level: result.level,
            score: result.score,
            total_questions: result.total_questions,
            percentage: result.percentage,
            time_spent: result.time_spent,
            answers: Json(result.answers),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<QuizResult>> {
        let results = self.results.read().await;
        Ok(results.iter().find(|result| result.id == id).cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<QuizResult>> {
        let results = self.results.read().await;
        // Reverse insertion order first so the stable sort keeps later
        // inserts ahead on equal timestamps.
        let mut mine: Vec<QuizResult> = results
            .iter()
            .rev()
            .filter(|result| result.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    async fn exists_for_level(&self, user_id: Uuid, level: &str) -> AppResult<bool> {
        let results = self.results.read().await;
        Ok(results
            .iter()
            .any(|result| result.user_id == user_id && result.level == level))
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        database_max_connections: 1,
        cors_origins: vec!["http://localhost:3000".to_string()],
        log_dir: "logs".to_string(),
        // Cheap argon2 cost for tests
        hash: HashConfig {
            memory_kib: Some(1024),
            iterations: Some(1),
            parallelism: Some(1),
        },
    }
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub users: Arc<InMemoryUserRepository>,
    pub results: Arc<InMemoryQuizResultRepository>,
}

/// Spawns the app on a random port, backed by in-memory repositories.
pub async fn spawn_app() -> TestApp {
    let users = Arc::new(InMemoryUserRepository::default());
    let results = Arc::new(InMemoryQuizResultRepository::default());

    let state = AppState::new(test_config(), users.clone(), results.clone())
        .expect("Failed to build app state");
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        client: reqwest::Client::new(),
        users,
        results,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn register(&self, email: &str, password: &str, full_name: &str) -> reqwest::Response {
        self.client
            .post(self.url("/register"))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "full_name": full_name
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/login"))
            .json(&serde_json::json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Registers and logs in, returning the bearer token.
    pub async fn signed_in_user(&self, email: &str) -> String {
        let response = self.register(email, PASSWORD, "Test User").await;
        assert_eq!(response.status().as_u16(), 201);

        let body: serde_json::Value = self
            .login(email, PASSWORD)
            .await
            .json()
            .await
            .expect("Failed to parse login json");

        body["access_token"]
            .as_str()
            .expect("Token not found")
            .to_string()
    }

    pub async fn submit(&self, token: &str, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url("/quiz-results"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, token: &str, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}_{}@example.com", prefix, &Uuid::new_v4().to_string()[..8])
}
