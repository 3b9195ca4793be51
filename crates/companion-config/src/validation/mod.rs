//! Full configuration validation.
//!
//! Each section has its own validator; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod helpers;


use crate::schema::CompanionConfig;
use companion_common::ConfigError;

use helpers::{validate_range, validate_range_f64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &CompanionConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_model(&mut errors, config);
    validate_window(&mut errors, config);
    validate_interaction(&mut errors, config);
    validate_focus(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_model(errors: &mut Vec<String>, config: &CompanionConfig) {
    if config.model.path.trim().is_empty() {
        errors.push("model.path must not be empty".into());
    }
    if config.model.page.trim().is_empty() {
        errors.push("model.page must not be empty".into());
    }
}

fn validate_window(errors: &mut Vec<String>, config: &CompanionConfig) {
    validate_range(errors, "window.width", config.window.width, 200, 8192);
    validate_range(errors, "window.height", config.window.height, 200, 8192);
}

fn validate_interaction(errors: &mut Vec<String>, config: &CompanionConfig) {
    let i = &config.interaction;
    validate_range_f64(errors, "interaction.wheel_factor", i.wheel_factor, 1.01, 2.0);
    validate_range_f64(errors, "interaction.min_scale", i.min_scale, 0.01, 1.0);
    validate_range_f64(errors, "interaction.max_scale", i.max_scale, 1.0, 10.0);
    if i.min_scale >= i.max_scale {
        errors.push(format!(
            "interaction.min_scale ({}) must be below interaction.max_scale ({})",
            i.min_scale, i.max_scale
        ));
    }
    validate_range(
        errors,
        "interaction.save_debounce_ms",
        i.save_debounce_ms,
        50,
        10_000,
    );
}

fn validate_focus(errors: &mut Vec<String>, config: &CompanionConfig) {
    let f = &config.focus;
    validate_range_f64(
        errors,
        "focus.proximity_threshold",
        f.proximity_threshold,
        0.0,
        1000.0,
    );
    validate_range(errors, "focus.hide_delay_ms", f.hide_delay_ms, 100, 60_000);
}
