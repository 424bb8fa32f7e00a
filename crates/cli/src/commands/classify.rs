use kabysdoh_domain::Dataset;
use std::net::IpAddr;

pub fn run(dataset: &Dataset, addrs: &[IpAddr]) -> anyhow::Result<()> {
    for addr in addrs {
        let verdict = if dataset.is_blocked(*addr) {
            "blocked"
        } else {
            "allowed"
        };
        let cdn = dataset.cdn_for(*addr).map_or("-", |cdn| cdn.as_ref());
        println!("{addr:<40} {verdict:<8} {cdn}");
    }
    Ok(())
}
