use ipnetwork::{Ipv4Network, Ipv6Network};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::collections::hash_map::Entry;
use std::fmt;
use std::hash::Hash;
use std::ops::BitAnd;

/// Unsigned integer holding an address in network bit order.
pub trait AddressBits:
    Copy + Eq + Hash + fmt::Debug + BitAnd<Output = Self> + Send + Sync + 'static
{
    const ALL_ONES: Self;
}

impl AddressBits for u32 {
    const ALL_ONES: Self = u32::MAX;
}

impl AddressBits for u128 {
    const ALL_ONES: Self = u128::MAX;
}

/// A network address with its netmask. The address is stored pre-masked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetRange<A> {
    pub network: A,
    pub mask: A,
}

impl<A: AddressBits> NetRange<A> {
    pub fn new(network: A, mask: A) -> Self {
        Self {
            network: network & mask,
            mask,
        }
    }

    #[inline]
    pub fn contains(&self, ip: A) -> bool {
        ip & self.mask == self.network
    }
}

impl From<Ipv4Network> for NetRange<u32> {
    fn from(net: Ipv4Network) -> Self {
        NetRange::new(u32::from(net.network()), u32::from(net.mask()))
    }
}

impl From<Ipv6Network> for NetRange<u128> {
    fn from(net: Ipv6Network) -> Self {
        NetRange::new(u128::from(net.network()), u128::from(net.mask()))
    }
}

#[derive(Debug, Clone)]
enum Bucket<A, P> {
    /// The range mask equals the common mask, so key equality is a full match.
    Direct(P),
    /// Longer masks sharing the bucket key, scanned in insertion order.
    Candidates(SmallVec<[(NetRange<A>, P); 2]>),
}

/// Shape of the bucket an address falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketKind {
    Direct,
    Candidates(usize),
}

/// Two-tier CIDR matcher: one hash probe on `ip & common_mask`, then a
/// linear scan of the colliding candidates only.
#[derive(Debug, Clone)]
pub struct SubnetMatcher<A, P = ()> {
    common_mask: A,
    buckets: FxHashMap<A, Bucket<A, P>>,
    ranges: usize,
}

impl<A: AddressBits, P> SubnetMatcher<A, P> {
    pub fn new<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = (NetRange<A>, P)>,
    {
        let ranges: Vec<(NetRange<A>, P)> = ranges.into_iter().collect();
        let common_mask = ranges
            .iter()
            .fold(A::ALL_ONES, |acc, (range, _)| acc & range.mask);
        let count = ranges.len();

        let mut buckets: FxHashMap<A, Bucket<A, P>> = FxHashMap::default();
        for (range, payload) in ranges {
            let key = range.network & common_mask;
            if range.mask == common_mask {
                match buckets.entry(key) {
                    // Direct covers every candidate of the bucket; first one stays.
                    Entry::Occupied(mut slot) => {
                        if matches!(slot.get(), Bucket::Candidates(_)) {
                            slot.insert(Bucket::Direct(payload));
                        }
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(Bucket::Direct(payload));
                    }
                }
            } else {
                match buckets
                    .entry(key)
                    .or_insert_with(|| Bucket::Candidates(SmallVec::new()))
                {
                    Bucket::Direct(_) => {}
                    Bucket::Candidates(list) => list.push((range, payload)),
                }
            }
        }

        Self {
            common_mask,
            buckets,
            ranges: count,
        }
    }

    #[inline]
    pub fn lookup(&self, ip: A) -> Option<&P> {
        match self.buckets.get(&(ip & self.common_mask))? {
            Bucket::Direct(payload) => Some(payload),
            Bucket::Candidates(list) => list
                .iter()
                .find(|(range, _)| range.contains(ip))
                .map(|(_, payload)| payload),
        }
    }

    #[inline]
    pub fn contains(&self, ip: A) -> bool {
        self.lookup(ip).is_some()
    }

    pub fn common_mask(&self) -> A {
        self.common_mask
    }

    pub fn bucket_kind(&self, ip: A) -> Option<BucketKind> {
        self.buckets
            .get(&(ip & self.common_mask))
            .map(|bucket| match bucket {
                Bucket::Direct(_) => BucketKind::Direct,
                Bucket::Candidates(list) => BucketKind::Candidates(list.len()),
            })
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of ranges the matcher was built from.
    pub fn len(&self) -> usize {
        self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges == 0
    }
}

impl<A: AddressBits, P> Default for SubnetMatcher<A, P> {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}
