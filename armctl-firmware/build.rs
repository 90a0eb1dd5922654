//! Build script for armctl-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates arm.toml and embeds it as a postcard blob

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use armctl_core::config::{ArmConfig, JointLimits};
use armctl_core::JOINT_COUNT;

fn main() {
    setup_linker();
    embed_config();
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

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate arm.toml and write the encoded config to OUT_DIR
fn embed_config() {
    println!("cargo:rerun-if-changed=arm.toml");

    let config_path = Path::new("arm.toml");
    if !config_path.exists() {
        fail("arm.toml not found", &["The firmware requires an arm.toml next to Cargo.toml."]);
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read arm.toml", &[&e.to_string()]),
    };

    let value: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            let msg = e.to_string();
            let lines: Vec<&str> = msg.lines().collect();
            fail("Invalid TOML syntax in arm.toml", &lines)
        }
    };

    let config = match build_config(&value) {
        Ok(config) => config,
        Err(errors) => {
            let lines: Vec<&str> = errors.iter().map(String::as_str).collect();
            fail("Invalid arm configuration", &lines)
        }
    };

    if let Err(e) = config.validate() {
        fail("Invalid arm configuration", &[&e.to_string()]);
    }

    let blob = postcard::to_stdvec(&config).unwrap();
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("arm_config.bin"), blob).unwrap();

    println!("cargo:warning=arm.toml validated successfully");
}

/// Translate the TOML document into an `ArmConfig`, collecting every problem
fn build_config(value: &toml::Value) -> Result<ArmConfig, Vec<String>> {
    let mut config = ArmConfig::default();
    let mut errors = Vec::new();

    match value.get("arm").and_then(|a| a.as_table()) {
        Some(arm) => {
            if let Some(v) = arm.get("step_interval_ms") {
                match v.as_integer().and_then(|i| u16::try_from(i).ok()) {
                    Some(ms) => config.step_interval_ms = ms,
                    None => errors.push("[arm] step_interval_ms must be an integer".into()),
                }
            }
            if let Some(v) = arm.get("baud_rate") {
                match v.as_integer().and_then(|i| u32::try_from(i).ok()) {
                    Some(baud) => config.baud_rate = baud,
                    None => errors.push("[arm] baud_rate must be a positive integer".into()),
                }
            }
        }
        None => errors.push("Missing [arm] section".into()),
    }

    let joints = match value.get("joint").and_then(|j| j.as_array()) {
        Some(joints) => joints,
        None => {
            errors.push("Missing [[joint]] entries".into());
            return Err(errors);
        }
    };
    if joints.len() != JOINT_COUNT {
        errors.push(format!(
            "Expected {} [[joint]] entries, found {}",
            JOINT_COUNT,
            joints.len()
        ));
        return Err(errors);
    }

    for (i, joint) in joints.iter().enumerate() {
        let label = joint
            .get("name")
            .and_then(|n| n.as_str())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("#{}", i + 1));
        let mut field = |key: &str| -> Option<i16> {
            match joint.get(key).and_then(|v| v.as_integer()) {
                Some(n) => match i16::try_from(n) {
                    Ok(n) => Some(n),
                    Err(_) => {
                        errors.push(format!("[joint {}] '{}' out of range", label, key));
                        None
                    }
                },
                None => {
                    errors.push(format!("[joint {}] missing integer '{}'", label, key));
                    None
                }
            }
        };
        let (min, max, home) = (field("min"), field("max"), field("home"));
        if let (Some(min), Some(max), Some(home)) = (min, max, home) {
            config.limits[i] = JointLimits::new(min, max);
            config.home[i] = home;
        }
    }

    if errors.is_empty() {
        Ok(config)
    } else {
        Err(errors)
    }
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[&str]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.to_string()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}
