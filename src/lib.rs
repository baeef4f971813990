// Biblioteca do backend: expõe os módulos para o binário e para os testes de
// integração em tests/.

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
