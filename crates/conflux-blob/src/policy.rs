use conflux_store::StoreResult;

use crate::client::ObjectMeta;

/// Chooses which object a reader sees when a slot holds several.
///
/// Writers never overwrite: concurrent persists to one slot land as
/// distinct digest-named objects. The policy resolves that multiplicity at
/// read time. Selection must depend only on the candidates' metadata, not
/// on iteration order, and the first iteration error must be returned
/// unchanged with no partial winner.
pub trait ReadPolicy: Send + Sync {
    fn select(
        &self,
        candidates: &mut dyn Iterator<Item = StoreResult<ObjectMeta>>,
    ) -> StoreResult<Option<ObjectMeta>>;
}

/// Take the earliest-created object: the slot keeps its first write.
#[derive(Clone, Copy, Debug, Default)]
pub struct TakeFirstCreated;

impl ReadPolicy for TakeFirstCreated {
    fn select(
        &self,
        candidates: &mut dyn Iterator<Item = StoreResult<ObjectMeta>>,
    ) -> StoreResult<Option<ObjectMeta>> {
        let mut result: Option<ObjectMeta> = None;
        for candidate in candidates {
            let candidate = candidate?;
            match &result {
                Some(current) if candidate.created >= current.created => {}
                _ => result = Some(candidate),
            }
        }
        Ok(result)
    }
}

/// Take the latest-created object: the slot reflects its newest write.
#[derive(Clone, Copy, Debug, Default)]
pub struct TakeLastCreated;

impl ReadPolicy for TakeLastCreated {
    fn select(
        &self,
        candidates: &mut dyn Iterator<Item = StoreResult<ObjectMeta>>,
    ) -> StoreResult<Option<ObjectMeta>> {
        let mut result: Option<ObjectMeta> = None;
        for candidate in candidates {
            let candidate = candidate?;
            match &result {
                Some(current) if candidate.created <= current.created => {}
                _ => result = Some(candidate),
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use conflux_store::StoreError;

    fn meta(name: &str, secs: i64) -> ObjectMeta {
        ObjectMeta::new(name, Utc.timestamp_opt(secs, 0).unwrap())
    }

    fn ok_iter(metas: Vec<ObjectMeta>) -> impl Iterator<Item = StoreResult<ObjectMeta>> {
        metas.into_iter().map(Ok)
    }

    #[test]
    fn first_created_picks_earliest() {
        let winner = TakeFirstCreated
            .select(&mut ok_iter(vec![
                meta("b", 200),
                meta("a", 100),
                meta("c", 300),
            ]))
            .unwrap();
        assert_eq!(winner.unwrap().name, "a");
    }

    #[test]
    fn last_created_picks_latest() {
        let winner = TakeLastCreated
            .select(&mut ok_iter(vec![
                meta("b", 200),
                meta("c", 300),
                meta("a", 100),
            ]))
            .unwrap();
        assert_eq!(winner.unwrap().name, "c");
    }

    #[test]
    fn selection_is_independent_of_iteration_order() {
        let forward = vec![meta("a", 100), meta("b", 200), meta("c", 300)];
        let mut reversed = forward.clone();
        reversed.reverse();

        let from_forward = TakeFirstCreated
            .select(&mut ok_iter(forward.clone()))
            .unwrap()
            .unwrap();
        let from_reversed = TakeFirstCreated
            .select(&mut ok_iter(reversed.clone()))
            .unwrap()
            .unwrap();
        assert_eq!(from_forward, from_reversed);

        let from_forward = TakeLastCreated
            .select(&mut ok_iter(forward))
            .unwrap()
            .unwrap();
        let from_reversed = TakeLastCreated
            .select(&mut ok_iter(reversed))
            .unwrap()
            .unwrap();
        assert_eq!(from_forward, from_reversed);
    }

    #[test]
    fn empty_candidates_select_nothing() {
        assert!(TakeFirstCreated
            .select(&mut ok_iter(Vec::new()))
            .unwrap()
            .is_none());
        assert!(TakeLastCreated
            .select(&mut ok_iter(Vec::new()))
            .unwrap()
            .is_none());
    }

    #[test]
    fn iteration_error_propagates_without_partial_winner() {
        let mut candidates = vec![
            Ok(meta("a", 100)),
            Err(StoreError::Backend("listing interrupted".into())),
            Ok(meta("b", 200)),
        ]
        .into_iter();

        let err = TakeFirstCreated.select(&mut candidates).unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn tie_keeps_first_candidate_seen() {
        let winner = TakeLastCreated
            .select(&mut ok_iter(vec![meta("x", 100), meta("y", 100)]))
            .unwrap();
        assert_eq!(winner.unwrap().name, "x");
    }
}
