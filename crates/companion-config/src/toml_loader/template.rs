//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Companion Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[model]
# path = "models/default/default.model3.json"
# page = "overlay/index.html"
# assets_dir = "assets"

[window]
# title = "Companion"
# width = 1280            # 200-8192
# height = 800            # 200-8192
# always_on_top = true
# transparent = true

[interaction]
# wheel_zoom = true
# wheel_factor = 1.1      # 1.01-2.0
# touch_zoom = true
# min_scale = 0.1         # 0.01-1.0
# max_scale = 2.0         # 1.0-10.0
# save_debounce_ms = 500  # 50-10000

[focus]
# track_proximity = true
# proximity_threshold = 70.0  # 0-1000 px
# hide_delay_ms = 1000        # 100-60000

[display]
# relocate_on_drag = true
# restore_display = true

[storage]
# preferences_file = "/path/to/preferences.json"

[logging]
# level = "INFO"          # TRACE, DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
