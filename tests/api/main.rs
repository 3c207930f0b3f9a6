mod auth;
mod formatters;
mod helpers;
mod postgres;
mod user;
