//! Candidate aggregation across tags.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use futures::future::join_all;
use tracing::debug;

use super::types::Candidate;
use crate::gateway::MetadataGateway;
use crate::provider::{CandidateMovie, DiscoverFilters, ProviderKeyword};
use crate::tags::ResolvedTag;

/// Deduplicated superlist plus lookup bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct AggregatedCandidates {
    pub candidates: Vec<Candidate>,
    /// Provider lookups issued (one per distinct provider reference).
    pub lookups: usize,
    pub failed_lookups: usize,
}

impl AggregatedCandidates {
    /// Every lookup failed, so the provider could not be queried at all.
    pub fn total_failure(&self) -> bool {
        self.lookups > 0 && self.failed_lookups == self.lookups
    }
}

pub struct CandidateAggregator<'a> {
    gateway: &'a MetadataGateway,
    per_tag_limit: usize,
}

impl<'a> CandidateAggregator<'a> {
    pub fn new(gateway: &'a MetadataGateway, per_tag_limit: usize) -> Self {
        Self {
            gateway,
            per_tag_limit,
        }
    }

    /// Fetch candidates for every tag concurrently, then merge.
    ///
    /// Tags sharing a provider reference are looked up once and all of them
    /// are credited in `source_tags`.
    pub async fn aggregate(&self, tags: &[ResolvedTag], filters: &DiscoverFilters) -> AggregatedCandidates {
        let mut groups: BTreeMap<ProviderKeyword, Vec<&str>> = BTreeMap::new();
        for tag in tags {
            groups.entry(tag.provider).or_default().push(tag.tag.as_str());
        }

        let lookups = join_all(groups.keys().map(|keyword| {
            self.gateway
                .search_by_tag(*keyword, filters, self.per_tag_limit)
        }))
        .await;

        let mut merger = Merger::default();
        let mut failed_lookups = 0;
        for ((keyword, group_tags), lookup) in groups.iter().zip(lookups) {
            if lookup.failed {
                failed_lookups += 1;
                continue;
            }
            debug!(
                "{} returned {} candidates for {:?}",
                keyword,
                lookup.value.len(),
                group_tags
            );
            for movie in lookup.value {
                merger.add(movie, group_tags);
            }
        }

        AggregatedCandidates {
            candidates: merger.finish(),
            lookups: groups.len(),
            failed_lookups,
        }
    }

    /// Tag-agnostic discovery; candidates carry no source tags.
    pub async fn discover(&self, filters: &DiscoverFilters) -> AggregatedCandidates {
        let lookup = self.gateway.discover(filters, self.per_tag_limit).await;

        let mut merger = Merger::default();
        for movie in lookup.value {
            merger.add(movie, &[]);
        }

        AggregatedCandidates {
            candidates: merger.finish(),
            lookups: 1,
            failed_lookups: usize::from(lookup.failed),
        }
    }
}

/// Merge keyed by movie id. The first record seen for an id is kept and
/// source tags accumulate.
#[derive(Default)]
struct Merger {
    index: HashMap<u32, usize>,
    candidates: Vec<Candidate>,
}

impl Merger {
    fn add(&mut self, movie: CandidateMovie, tags: &[&str]) {
        match self.index.get(&movie.id) {
            Some(&i) => {
                self.candidates[i]
                    .source_tags
                    .extend(tags.iter().map(|t| t.to_string()));
            }
            None => {
                self.index.insert(movie.id, self.candidates.len());
                self.candidates.push(Candidate {
                    movie,
                    source_tags: tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
                });
            }
        }
    }

    fn finish(self) -> Vec<Candidate> {
        self.candidates
    }
}
