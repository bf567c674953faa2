//! Frontier and visited-set bookkeeping for one site's crawl
//!
//! This module handles:
//! - FIFO ordering of URLs waiting to be fetched (breadth-first traversal)
//! - Domain scoping of everything that enters the frontier
//! - O(1) membership over frontier ∪ visited, so no URL is queued twice
//! - The `Queued → Fetching → terminal` lifecycle of every URL

use crate::state::PageState;
use crate::url::{CrawlUrl, Domain};
use std::collections::{HashMap, VecDeque};

/// A URL waiting in the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// The URL to fetch
    pub url: CrawlUrl,

    /// Link distance from the site root (root is 0)
    pub depth: u32,
}

/// Outcome of offering a URL to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The URL was new and is now queued
    Enqueued,

    /// The URL is already queued, being fetched, or visited
    AlreadySeen,

    /// The URL belongs to another domain
    OffDomain,
}

/// Per-site frontier and visited set
///
/// Owned by exactly one engine for the duration of one site's crawl; a fresh
/// frontier is created for every site, so no state leaks between sites.
#[derive(Debug)]
pub struct Frontier {
    /// The only domain this frontier accepts
    domain: Domain,

    /// URLs waiting to be fetched, in discovery order
    queue: VecDeque<QueuedUrl>,

    /// Every URL ever admitted, with its current state
    states: HashMap<CrawlUrl, PageState>,

    /// Number of URLs currently in the Fetching state
    in_flight: usize,
}

impl Frontier {
    /// Creates a frontier scoped to the root's domain, seeded with the root
    pub fn new(root: CrawlUrl) -> Self {
        let mut frontier = Self {
            domain: root.domain().clone(),
            queue: VecDeque::new(),
            states: HashMap::new(),
            in_flight: 0,
        };
        frontier.push(root, 0);
        frontier
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Offers a URL to the frontier
    ///
    /// Only URLs on the frontier's domain that have never been seen before are
    /// queued.
    pub fn push(&mut self, url: CrawlUrl, depth: u32) -> Admission {
        if !url.is_on(&self.domain) {
            return Admission::OffDomain;
        }

        if self.states.contains_key(&url) {
            return Admission::AlreadySeen;
        }

        self.states.insert(url.clone(), PageState::Queued);
        self.queue.push_back(QueuedUrl { url, depth });
        Admission::Enqueued
    }

    /// Takes the next URL to fetch and marks it as visited
    ///
    /// The claim is the single point where a URL moves from the frontier to the
    /// visited set, so each URL is handed out at most once.
    pub fn claim(&mut self) -> Option<QueuedUrl> {
        while let Some(queued) = self.queue.pop_front() {
            match self.states.get_mut(&queued.url) {
                Some(state) if !state.is_visited() => {
                    *state = PageState::Fetching;
                    self.in_flight += 1;
                    return Some(queued);
                }
                _ => {
                    tracing::trace!("Skipping {}: already visited", queued.url);
                }
            }
        }
        None
    }

    /// Records the terminal state of a claimed URL
    ///
    /// Returns false (and changes nothing) if the URL was not being fetched or
    /// the state is not terminal.
    pub fn complete(&mut self, url: &CrawlUrl, state: PageState) -> bool {
        if !state.is_terminal() {
            return false;
        }

        match self.states.get_mut(url) {
            Some(current) if *current == PageState::Fetching => {
                *current = state;
                self.in_flight -= 1;
                true
            }
            _ => false,
        }
    }

    /// Drops every URL still waiting in the queue, returning how many there were
    ///
    /// Discarded URLs were never fetched, so they leave the bookkeeping entirely.
    pub fn discard_pending(&mut self) -> usize {
        let pending: Vec<QueuedUrl> = self.queue.drain(..).collect();
        for queued in &pending {
            self.states.remove(&queued.url);
        }
        pending.len()
    }

    /// Returns the number of URLs waiting to be fetched
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Returns the number of URLs currently being fetched
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
