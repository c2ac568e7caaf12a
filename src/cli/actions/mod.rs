pub mod server;

pub enum Action {
    Server {
        port: u16,
        dsn: String,
        token_secret: String,
        token_ttl: i64,
        frontend_origin: Option<String>,
    },
}
