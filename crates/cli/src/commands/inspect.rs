use kabysdoh_domain::Dataset;
use std::net::{Ipv4Addr, Ipv6Addr};

pub fn run(dataset: &Dataset) -> anyhow::Result<()> {
    let summary = dataset.summary();

    println!("blocked addresses    ipv4 {:>8}  ipv6 {:>8}", summary.blocked_v4, summary.blocked_v6);
    println!(
        "blocked subnets      ipv4 {:>8}  ipv6 {:>8}",
        summary.blocked_subnets_v4, summary.blocked_subnets_v6
    );
    println!(
        "cdn subnets          ipv4 {:>8}  ipv6 {:>8}",
        summary.cdn_subnets_v4, summary.cdn_subnets_v6
    );
    println!();

    println!(
        "blocklist common mask  {} ({} buckets)  {} ({} buckets)",
        Ipv4Addr::from(dataset.blocked_subnets_v4().common_mask()),
        dataset.blocked_subnets_v4().bucket_count(),
        Ipv6Addr::from(dataset.blocked_subnets_v6().common_mask()),
        dataset.blocked_subnets_v6().bucket_count(),
    );
    println!(
        "cdn common mask        {} ({} buckets)  {} ({} buckets)",
        Ipv4Addr::from(dataset.cdn_subnets_v4().common_mask()),
        dataset.cdn_subnets_v4().bucket_count(),
        Ipv6Addr::from(dataset.cdn_subnets_v6().common_mask()),
        dataset.cdn_subnets_v6().bucket_count(),
    );
    println!();

    println!("{} CDNs, {} probe domains", summary.cdns, summary.probe_domains);
    for cdn in dataset.cdns() {
        let probes = dataset.probe_domains(cdn);
        if probes.is_empty() {
            println!("  {cdn:<24} (no probe domains)");
            continue;
        }
        let names: Vec<String> = probes.iter().map(ToString::to_string).collect();
        println!("  {cdn:<24} {}", names.join(" "));
    }

    Ok(())
}
