pub mod optimizer_settings;
