// Endpoint callers
//
// One inherent `ApiClient` method per remote operation, grouped by
// resource. Each issues exactly one HTTP call and never retries.

mod access_logs;
mod access_rules;
mod auth;
mod campus;
mod reports;
mod users;
