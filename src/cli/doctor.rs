//! Environment readiness check.

use crate::browser::find_chromium;
use anyhow::Result;
use std::path::Path;

/// Check Chromium availability and output-directory writability.
pub async fn run(out_dir: &Path) -> Result<()> {
    println!("Vantage Doctor");
    println!("==============");
    println!();

    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;
    println!("OS:   {os}");
    println!("Arch: {arch}");
    println!();

    // Check Chromium
    let chromium_path = find_chromium();
    match &chromium_path {
        Some(path) => println!("[OK] Chromium found: {}", path.display()),
        None => println!(
            "[!!] Chromium NOT found. Install google-chrome or set VANTAGE_CHROMIUM_PATH."
        ),
    }

    // Check screenshot output directory
    let writable = match std::fs::create_dir_all(out_dir) {
        Ok(()) => {
            let probe = out_dir.join(".vantage-doctor");
            let ok = std::fs::write(&probe, b"ok").is_ok();
            std::fs::remove_file(&probe).ok();
            ok
        }
        Err(_) => false,
    };
    if writable {
        println!("[OK] Output directory {} is writable", out_dir.display());
    } else {
        println!("[!!] Output directory {} is NOT writable", out_dir.display());
    }

    println!();
    if chromium_path.is_some() && writable {
        println!("Status: READY");
    } else {
        println!("Status: NOT READY");
    }

    Ok(())
}
