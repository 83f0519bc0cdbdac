//! Sample data served in demo mode when the backend cannot be reached.
//!
//! Everything here is fabricated locally. The accessors wrap it in
//! [`Sourced::Fallback`](crate::Sourced::Fallback) so it is never mistaken
//! for server data.

use std::sync::atomic::{AtomicU64, Ordering};

use jiff::Timestamp;
use rust_decimal::{Decimal, dec};

use crate::requests::{NewBooking, ProfileUpdate, ServiceDraft};
use crate::{
    Booking, BookingId, BookingStatus, ProviderStats, Service, ServiceId,
    UserProfile, requests::ServiceFilters,
};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// An id derived from the current time. A process-wide sequence number is
/// appended so two ids generated within the same millisecond still differ.
pub fn generate_id() -> String {
    let millis = Timestamp::now().as_millisecond();
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{millis}{sequence:04}")
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: &str,
    name: &str,
    category: &str,
    price: Decimal,
    description: &str,
    image_url: &str,
    provider_name: &str,
    provider_email: &str,
    rating: f64,
) -> Service {
    Service {
        id: ServiceId::from(id),
        name: name.into(),
        category: category.into(),
        price,
        description: description.into(),
        image_url: image_url.into(),
        provider_name: provider_name.into(),
        provider_email: provider_email.into(),
        rating,
        review_count: 0,
        reviews: Vec::new(),
    }
}

/// The ten sample listings, one per trade except for two technicians.
pub fn services() -> Vec<Service> {
    vec![
        sample(
            "6910b75c60ac83096955489d",
            "Electric Repair",
            "Electrician",
            dec!(120),
            "Fix all types of electrical wiring and power issues safely.",
            "https://i.ibb.co.com/xSnn0WyV/electrician-working-on-electrical-panel-circuit-breaker-box.jpg",
            "John Electric Co.",
            "john@homehero.com",
            4.8,
        ),
        sample(
            "6910b75c60ac83096955489e",
            "Plumbing Maintenance",
            "Plumber",
            dec!(100),
            "Leaky taps? Broken pipes? Quick and reliable plumbing service.",
            "https://i.ibb.co.com/Y72TPNpc/indian-plumber-installing-water-equipment-meter-filter-pressure-reducer.jpg",
            "SmartFix Plumbing",
            "smartfix@homehero.com",
            4.6,
        ),
        sample(
            "6910b75c60ac83096955489f",
            "Home Cleaning",
            "Cleaner",
            dec!(80),
            "Complete home cleaning using eco-friendly supplies.",
            "https://i.ibb.co.com/DfhbR44w/rsz-cleaner-3122363-1920-min.jpg",
            "Sparkle Cleaners",
            "sparkle@homehero.com",
            4.9,
        ),
        sample(
            "6910b75c60ac8309695548a0",
            "AC Installation",
            "Technician",
            dec!(250),
            "Professional AC installation and maintenance for all brands.",
            "https://i.ibb.co.com/tTbxgZHB/images-q-tbn-ANd9-Gc-QOWZUVEJi-UJs-xmg-JOZQDRIY7s-N8-ECc-T6-A2-A-s.jpg",
            "CoolAir Experts",
            "coolair@homehero.com",
            4.7,
        ),
        sample(
            "6910b75c60ac8309695548a1",
            "Carpentry Work",
            "Carpenter",
            dec!(150),
            "Custom furniture, door repairs, and wood finishing.",
            "https://i.ibb.co.com/n8wTLcyc/The-Top-10-Benefits-Of-Hiring-A-Professional-Carpenter.jpg",
            "WoodCraft Masters",
            "woodcraft@homehero.com",
            4.5,
        ),
        sample(
            "6910b75c60ac8309695548a2",
            "Painting Service",
            "Painter",
            dec!(200),
            "Brighten up your home with high-quality paint finishes.",
            "https://i.ibb.co.com/PsH3FxQR/Tips-to-Choose-the-Perfect-Painter-for-Your-Dream-Home.jpg",
            "ColorLine Painting",
            "colorline@homehero.com",
            4.8,
        ),
        sample(
            "6910b75c60ac8309695548a3",
            "Gardening & Lawn Care",
            "Gardener",
            dec!(90),
            "Professional lawn mowing and plant maintenance.",
            "https://i.ibb.co.com/SXwhLgqh/how-to-become-a-gardener.jpg",
            "GreenThumb Services",
            "green@homehero.com",
            4.6,
        ),
        sample(
            "6910b75c60ac8309695548a4",
            "Pest Control",
            "Pest Control",
            dec!(110),
            "Eliminate pests safely and effectively with our chemical-free methods.",
            "https://i.ibb.co.com/rR49c8mZ/Why-Regular-Pest-Control-is-Essential-for-a-Healthy-Home.webp",
            "SafeHome Pest Control",
            "safehome@homehero.com",
            4.9,
        ),
        sample(
            "6910b75c60ac8309695548a5",
            "CCTV Installation",
            "Security",
            dec!(300),
            "Install and configure advanced security cameras for your home.",
            "https://i.ibb.co.com/0pQssWD3/360-F-134184535-k-ERWx-PF9fb-AMp-M3zy-MRbk-Xi-T4-Jr4-C86m.jpg",
            "SecureVision Ltd",
            "securevision@homehero.com",
            4.8,
        ),
        sample(
            "6910b75c60ac8309695548a6",
            "Appliance Repair",
            "Technician",
            dec!(130),
            "Repair all types of home appliances: washing machine, fridge, etc.",
            "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcQgBXtikX6yLom5TKlZw3s7Edh4_IRpakzOng&s",
            "QuickFix Repairs",
            "quickfix@homehero.com",
            4.7,
        ),
    ]
}

pub fn services_matching(filters: &ServiceFilters) -> Vec<Service> {
    services()
        .into_iter()
        .filter(|service| filters.matches(service))
        .collect()
}

/// The sample service with `id`, or the first sample if none matches.
pub fn service(id: &ServiceId) -> Service {
    let mut all = services();
    let index = all.iter().position(|s| &s.id == id).unwrap_or(0);
    all.swap_remove(index)
}

pub fn created_service(draft: &ServiceDraft) -> Service {
    updated_service(&ServiceId(generate_id()), draft)
}

pub fn updated_service(id: &ServiceId, draft: &ServiceDraft) -> Service {
    Service {
        id: id.clone(),
        name: draft.name.clone(),
        category: draft.category.clone(),
        price: draft.price,
        description: draft.description.clone(),
        image_url: draft.image_url.clone(),
        provider_name: draft.provider_name.clone(),
        provider_email: draft.provider_email.clone(),
        rating: 0.0,
        review_count: 0,
        reviews: Vec::new(),
    }
}

/// Sample bookings: one pending, one confirmed, one completed and not yet
/// reviewed.
pub fn bookings() -> Vec<Booking> {
    let all = services();
    let booking = |id: &str,
                   service: &Service,
                   date: i64,
                   status: BookingStatus| Booking {
        id: BookingId::from(id),
        service_id: service.id.clone(),
        service_name: service.name.clone(),
        price: service.price,
        provider_email: service.provider_email.clone(),
        booking_date: Timestamp::constant(date, 0),
        special_requests: None,
        status,
        review: None,
        created_at: Timestamp::constant(date - 7 * 86_400, 0),
    };
    vec![
        booking(
            "demo-booking-1",
            &all[1],
            1_893_484_800,
            BookingStatus::Pending,
        ),
        booking(
            "demo-booking-2",
            &all[2],
            1_893_571_200,
            BookingStatus::Confirmed,
        ),
        booking(
            "demo-booking-3",
            &all[0],
            1_735_725_600,
            BookingStatus::Completed,
        ),
    ]
}

pub fn created_booking(new: &NewBooking) -> Booking {
    Booking {
        id: BookingId(generate_id()),
        service_id: new.service_id.clone(),
        service_name: new.service_name.clone(),
        price: new.price,
        provider_email: new.provider_email.clone(),
        booking_date: new.booking_date,
        special_requests: new.special_requests.clone(),
        status: BookingStatus::Pending,
        review: None,
        created_at: Timestamp::now(),
    }
}

pub fn profile() -> UserProfile {
    UserProfile {
        name: "Demo User".into(),
        email: "demo@homehero.com".into(),
        photo_url: None,
    }
}

pub fn updated_profile(update: &ProfileUpdate) -> UserProfile {
    let mut profile = profile();
    if let Some(name) = &update.name {
        profile.name = name.clone();
    }
    if update.photo_url.is_some() {
        profile.photo_url = update.photo_url.clone();
    }
    profile
}

pub fn provider_stats() -> ProviderStats {
    ProviderStats::default()
}
