//! Analytics command handler

use anyhow::Result;

use biolink_core::analytics::{DEVICE_SAMPLE, GEO_SAMPLE, WEEKLY_SAMPLE};

use crate::output::{Output, OutputFormat};

/// Show the sample traffic series
pub fn show(output: &Output) -> Result<()> {
    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "weekly": WEEKLY_SAMPLE,
                    "devices": DEVICE_SAMPLE,
                    "countries": GEO_SAMPLE,
                })
            );
        }
        OutputFormat::Quiet => {
            for day in WEEKLY_SAMPLE {
                println!("{} {} {}", day.day, day.views, day.clicks);
            }
        }
        OutputFormat::Human => {
            println!("Traffic (sample week)");
            println!("=====================");
            for day in WEEKLY_SAMPLE {
                let bar = "#".repeat((day.views / 20) as usize);
                println!("{:<4} {:>4} views {:>4} clicks  {}", day.day, day.views, day.clicks, bar);
            }
            println!();
            println!("Devices");
            println!("=======");
            let total: u64 = DEVICE_SAMPLE.iter().map(|d| d.count).sum();
            for device in DEVICE_SAMPLE {
                let pct = device.count * 100 / total.max(1);
                println!("{:<8} {:>6} ({}%)", device.device, device.count, pct);
            }
            println!();
            println!("Audience");
            println!("========");
            for geo in GEO_SAMPLE {
                println!("{} {:<20} {:>6} visitors", geo.code, geo.country, geo.visitors);
            }
        }
    }
    Ok(())
}
