//! Build script for turnkeeper-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates device.toml and turns it into `device_config.rs`

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const MAX_PARTICIPANTS: usize = 8;
const MAX_NAME_LEN: usize = 12;

fn main() {
    setup_linker();
    let device = validate_config();
    generate_config(&device);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validated contents of device.toml
struct Device {
    mode: &'static str,
    participants: Vec<String>,
    contrast: u8,
    poll_interval_ms: u32,
    transition_steps: u8,
    frame_delay_ms: u32,
    power_up_delay_ms: u32,
    blink_interval_ms: u32,
}

/// Validate device.toml configuration at compile time
fn validate_config() -> Device {
    // Re-run if device.toml changes
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a device.toml configuration file.         ║\n\
            ║  Please create one in the turnkeeper-firmware directory.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in device.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();

    let mode = validate_mode(&config, &mut errors);
    let participants = validate_participants(&config, &mut errors);
    let contrast = int_in_range(&config, "display", "contrast", 0xCF, 0..=255, &mut errors);
    let poll_interval_ms =
        int_in_range(&config, "timing", "poll_interval_ms", 20, 5..=200, &mut errors);
    let transition_steps =
        int_in_range(&config, "timing", "transition_steps", 12, 1..=64, &mut errors);
    let frame_delay_ms = int_in_range(&config, "timing", "frame_delay_ms", 20, 0..=1000, &mut errors);
    let power_up_delay_ms =
        int_in_range(&config, "timing", "power_up_delay_ms", 100, 0..=5000, &mut errors);
    let blink_interval_ms =
        int_in_range(&config, "timing", "blink_interval_ms", 500, 10..=10_000, &mut errors);

    if !errors.is_empty() {
        report_errors("Invalid device configuration", &errors);
    }

    println!("cargo:warning=device.toml validated successfully");

    // Ranges above keep every cast in bounds
    Device {
        mode,
        participants,
        contrast: contrast as u8,
        poll_interval_ms: poll_interval_ms as u32,
        transition_steps: transition_steps as u8,
        frame_delay_ms: frame_delay_ms as u32,
        power_up_delay_ms: power_up_delay_ms as u32,
        blink_interval_ms: blink_interval_ms as u32,
    }
}

/// Validate the run mode, defaulting to turn tracking
fn validate_mode(config: &toml::Value, errors: &mut Vec<String>) -> &'static str {
    match config.get("mode") {
        None => "Turns",
        Some(toml::Value::String(mode)) => match mode.as_str() {
            "turns" => "Turns",
            "blink" => "Blink",
            _ => {
                errors.push("mode must be 'turns' or 'blink'".to_string());
                "Turns"
            }
        },
        Some(_) => {
            errors.push("mode must be a string".to_string());
            "Turns"
        }
    }
}

/// Validate the participant list
fn validate_participants(config: &toml::Value, errors: &mut Vec<String>) -> Vec<String> {
    let list = match config.get("participants") {
        Some(toml::Value::Array(list)) => list,
        Some(_) => {
            errors.push("participants must be an array of names".to_string());
            return Vec::new();
        }
        None => {
            errors.push("Missing 'participants' - at least one name is required".to_string());
            return Vec::new();
        }
    };

    if list.is_empty() || list.len() > MAX_PARTICIPANTS {
        errors.push(format!(
            "participants must list 1-{} names",
            MAX_PARTICIPANTS
        ));
    }

    let mut names = Vec::new();
    for (i, entry) in list.iter().enumerate() {
        let name = match entry.as_str() {
            Some(name) => name,
            None => {
                errors.push(format!("participant {} must be a string", i));
                continue;
            }
        };

        if name.is_empty() || name.len() > MAX_NAME_LEN {
            errors.push(format!(
                "participant {} must be 1-{} characters",
                i, MAX_NAME_LEN
            ));
        }
        // The font only covers printable ASCII
        if !name.chars().all(|c| c.is_ascii_graphic() || c == ' ') {
            errors.push(format!("participant {} must be printable ASCII", i));
        }

        names.push(name.to_string());
    }

    names
}

/// Read an optional integer from `[section]`, checking its range
fn int_in_range(
    config: &toml::Value,
    section: &str,
    key: &str,
    default: i64,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> i64 {
    let value = match config.get(section) {
        None => return default,
        Some(toml::Value::Table(t)) => t.get(key),
        Some(_) => {
            errors.push(format!("[{}] must be a table", section));
            return default;
        }
    };

    match value {
        None => default,
        Some(toml::Value::Integer(v)) if range.contains(v) => *v,
        Some(toml::Value::Integer(_)) => {
            errors.push(format!(
                "[{}] {} must be {}-{}",
                section,
                key,
                range.start(),
                range.end()
            ));
            default
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            default
        }
    }
}

/// Write `device_config.rs` into OUT_DIR
fn generate_config(device: &Device) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let names = device
        .participants
        .iter()
        .map(|name| format!("{:?}", name))
        .collect::<Vec<_>>()
        .join(", ");

    let code = format!(
        "// Generated from device.toml by build.rs\n\
         \n\
         pub const PARTICIPANT_NAMES: &[&str] = &[{names}];\n\
         \n\
         pub const DEVICE: DeviceConfig = DeviceConfig {{\n\
         \x20   mode: RunMode::{mode},\n\
         \x20   poll_interval_ms: {poll},\n\
         \x20   transition_steps: {steps},\n\
         \x20   frame_delay_ms: {frame},\n\
         \x20   contrast: {contrast},\n\
         \x20   power_up_delay_ms: {power_up},\n\
         \x20   blink_interval_ms: {blink},\n\
         }};\n",
        names = names,
        mode = device.mode,
        poll = device.poll_interval_ms,
        steps = device.transition_steps,
        frame = device.frame_delay_ms,
        contrast = device.contrast,
        power_up = device.power_up_delay_ms,
        blink = device.blink_interval_ms,
    );

    let mut f = File::create(out_dir.join("device_config.rs")).unwrap();
    f.write_all(code.as_bytes()).unwrap();
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Abort the build with every collected error
fn report_errors(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
