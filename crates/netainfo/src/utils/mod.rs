pub mod sentry;
