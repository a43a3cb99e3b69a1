//! Font profiling.
//!
//! Every font family gets one representative size: the rounded size it is
//! used at most often. Families are then ordered by that size, largest
//! first, and the first K become the heading clusters.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use super::config::PipelineProfile;
use crate::model::Span;

/// One font family with its representative size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontCluster {
    /// Base font name
    pub font_name: String,
    /// Most frequent rounded size of this font
    pub size: i32,
    /// Number of spans drawn with this font, at any size
    pub occurrence_count: usize,
}

/// Ranked font clusters of one document.
#[derive(Debug, Clone, Default)]
pub struct FontProfile {
    clusters: Vec<FontCluster>,
    ranks: HashMap<(String, i32), usize>,
    default_rank: usize,
}

impl FontProfile {
    /// Build a profile from spans, keeping at most `cluster_limit` clusters.
    pub fn build<'a, I>(spans: I, cluster_limit: usize, default_rank: usize) -> Self
    where
        I: IntoIterator<Item = &'a Span>,
    {
        let mut histogram: IndexMap<&str, IndexMap<i32, usize>> = IndexMap::new();
        for span in spans {
            if span.text.trim().is_empty() {
                continue;
            }
            *histogram
                .entry(span.font_name.as_str())
                .or_default()
                .entry(span.font_size)
                .or_insert(0) += 1;
        }

        let mut clusters: Vec<FontCluster> = histogram
            .iter()
            .filter_map(|(font, sizes)| {
                let mut best: Option<(i32, usize)> = None;
                for (&size, &count) in sizes {
                    if best.map_or(true, |(_, c)| count > c) {
                        best = Some((size, count));
                    }
                }
                let (size, _) = best?;
                Some(FontCluster {
                    font_name: (*font).to_string(),
                    size,
                    occurrence_count: sizes.values().sum(),
                })
            })
            .collect();

        clusters.sort_by(|a, b| {
            b.size
                .cmp(&a.size)
                .then_with(|| b.occurrence_count.cmp(&a.occurrence_count))
        });
        clusters.truncate(cluster_limit);

        let ranks = clusters
            .iter()
            .enumerate()
            .map(|(rank, c)| ((c.font_name.clone(), c.size), rank))
            .collect();

        log::debug!(
            "Font profile: {}",
            clusters
                .iter()
                .map(|c| format!("{}@{}x{}", c.font_name, c.size, c.occurrence_count))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Self {
            clusters,
            ranks,
            default_rank,
        }
    }

    /// Build a profile with the limits of a pipeline profile.
    pub fn for_pipeline<'a, I>(spans: I, profile: &PipelineProfile) -> Self
    where
        I: IntoIterator<Item = &'a Span>,
    {
        Self::build(spans, profile.cluster_limit, profile.default_rank)
    }

    /// Kept clusters, rank 0 first.
    pub fn clusters(&self) -> &[FontCluster] {
        &self.clusters
    }

    /// Rank of a (font, rounded size) pair, if it is one of the clusters.
    pub fn explicit_rank(&self, font_name: &str, font_size: i32) -> Option<usize> {
        self.ranks.get(&(font_name.to_string(), font_size)).copied()
    }

    /// Rank of a (font, rounded size) pair, falling back to the default rank.
    pub fn rank_of(&self, font_name: &str, font_size: i32) -> usize {
        self.explicit_rank(font_name, font_size)
            .unwrap_or(self.default_rank)
    }

    /// Rank used for pairs outside the clusters.
    pub fn default_rank(&self) -> usize {
        self.default_rank
    }
}
