// Form body for registering and logging in
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CredentialsSchema {
    pub username: String,
    pub password: String,
}

// Form body for creating or updating a Todo
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct TodoSchema {
    pub title: String,
    pub desc: String,
}
