pub mod doctor;
pub mod geocode;
pub mod import;
pub mod nearby;
pub mod referrals;
pub mod stats;

use kliniki::facility::format::FacilityRecord;

/// Print a numbered facility list, one block per record.
fn print_records(records: &[FacilityRecord]) {
    for (i, r) in records.iter().enumerate() {
        match r.distance_km {
            Some(d) => println!("  {}. {} ({d:.2} km)", i + 1, r.name),
            None => println!("  {}. {}", i + 1, r.name),
        }
        println!("     Location:  {}", r.location);
        println!("     Category:  {}", r.category);
        if let Some(ref level) = r.keph_level {
            println!("     KEPH:      {level}");
        }
        if let Some(ref owner) = r.owner {
            println!("     Owner:     {owner}");
        }
        if let Some(ref capacity) = r.capacity {
            println!("     Capacity:  {capacity}");
        }
        if r.distance_km.is_some() {
            println!("     Services:  {}", r.services);
            println!("     Contact:   {}", r.contact);
            println!("     Website:   {}", r.website);
        }
        println!();
    }
}
