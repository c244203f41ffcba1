//! Sample analytics data
//!
//! The dashboard's analytics tab renders static sample series; there is
//! no collection pipeline behind it. Real counters (`views`, `clicks`)
//! live on the records themselves and are owned by the external
//! analytics collaborator.

use serde::Serialize;

/// One day of sample traffic
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DaySample {
    pub day: &'static str,
    pub views: u64,
    pub clicks: u64,
}

/// Share of visits per device class
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DeviceShare {
    pub device: &'static str,
    pub count: u64,
}

/// Visitors per country
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct GeoShare {
    pub country: &'static str,
    pub code: &'static str,
    pub visitors: u64,
}

/// A week of sample views/clicks for the traffic chart
pub const WEEKLY_SAMPLE: &[DaySample] = &[
    DaySample { day: "Mon", views: 120, clicks: 45 },
    DaySample { day: "Tue", views: 150, clicks: 55 },
    DaySample { day: "Wed", views: 200, clicks: 80 },
    DaySample { day: "Thu", views: 180, clicks: 60 },
    DaySample { day: "Fri", views: 250, clicks: 100 },
    DaySample { day: "Sat", views: 300, clicks: 140 },
    DaySample { day: "Sun", views: 280, clicks: 120 },
];

/// Sample device distribution for the pie chart
pub const DEVICE_SAMPLE: &[DeviceShare] = &[
    DeviceShare { device: "Mobile", count: 9800 },
    DeviceShare { device: "Desktop", count: 2100 },
    DeviceShare { device: "Tablet", count: 550 },
];

/// Sample audience-by-country table, largest first
pub const GEO_SAMPLE: &[GeoShare] = &[
    GeoShare { country: "Rép. Dém. du Congo", code: "CD", visitors: 8500 },
    GeoShare { country: "France", code: "FR", visitors: 2100 },
    GeoShare { country: "Belgique", code: "BE", visitors: 800 },
    GeoShare { country: "États-Unis", code: "US", visitors: 450 },
    GeoShare { country: "Canada", code: "CA", visitors: 300 },
];
