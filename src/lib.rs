pub mod core;
pub mod db;
pub mod jobs;
pub mod matching;
pub mod models;
pub mod routes;
pub mod scholar_match_web_server;
