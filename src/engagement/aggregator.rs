use crate::data::annotations::{Annotation, AnnotationStore};

/// Engagement figures for a market. Unknown ids report zero.
pub trait EngagementLookup {
    fn comment_count(&self, market_id: &str) -> u64;
    fn total_likes(&self, market_id: &str) -> u64;

    /// Each comment or reply is worth ten likes. Saturates at `u64::MAX`.
    fn engagement_score(&self, market_id: &str) -> u64 {
        self.comment_count(market_id)
            .saturating_mul(10)
            .saturating_add(self.total_likes(market_id))
    }
}

/// Top-level entries plus their replies.
pub fn comment_count(thread: &[Annotation]) -> u64 {
    thread
        .iter()
        .map(|a| (a.replies.len() as u64).saturating_add(1))
        .fold(0, u64::saturating_add)
}

/// Likes on top-level entries and on every reply.
pub fn total_likes(thread: &[Annotation]) -> u64 {
    thread
        .iter()
        .map(|a| a.replies.iter().map(|r| r.likes).fold(a.likes, u64::saturating_add))
        .fold(0, u64::saturating_add)
}

impl EngagementLookup for AnnotationStore {
    fn comment_count(&self, market_id: &str) -> u64 {
        self.with_thread(market_id, comment_count)
    }

    fn total_likes(&self, market_id: &str) -> u64 {
        self.with_thread(market_id, total_likes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_counts() {
        let store = AnnotationStore::demo();

        // demo-1: 2 comments + 1 reply, likes 47 + 23 + 65
        assert_eq!(store.comment_count("demo-1"), 3);
        assert_eq!(store.total_likes("demo-1"), 135);

        assert_eq!(store.comment_count("demo-2"), 1);
        assert_eq!(store.total_likes("demo-2"), 12);

        assert_eq!(store.comment_count("demo-3"), 3);
        assert_eq!(store.total_likes("demo-3"), 144);

        assert_eq!(store.comment_count("demo-4"), 2);
        assert_eq!(store.total_likes("demo-4"), 234);
    }

    #[test]
    fn test_unknown_market_is_zero() {
        let store = AnnotationStore::demo();
        assert_eq!(store.comment_count("nope"), 0);
        assert_eq!(store.total_likes("nope"), 0);
        assert_eq!(store.engagement_score("nope"), 0);

        let empty = AnnotationStore::new();
        assert_eq!(empty.comment_count("demo-1"), 0);
    }

    #[test]
    fn test_engagement_score() {
        let store = AnnotationStore::demo();
        assert_eq!(store.engagement_score("demo-1"), 3 * 10 + 135);
        assert_eq!(store.engagement_score("demo-4"), 2 * 10 + 234);
    }

    #[test]
    fn test_huge_like_counts_saturate() {
        let json = format!(
            r#"{{"m1": [
                {{"id": 1, "user": "a", "text": "x", "likes": {max},
                  "replies": [{{"id": 2, "user": "b", "text": "y", "likes": {max}}}]}},
                {{"id": 3, "user": "c", "text": "z", "likes": 5}}
            ]}}"#,
            max = u64::MAX
        );
        let store = AnnotationStore::from_json_str(&json).unwrap();

        assert_eq!(store.comment_count("m1"), 3);
        assert_eq!(store.total_likes("m1"), u64::MAX);
        assert_eq!(store.engagement_score("m1"), u64::MAX);
    }

    #[test]
    fn test_empty_thread() {
        assert_eq!(comment_count(&[]), 0);
        assert_eq!(total_likes(&[]), 0);
    }
}
