use crate::worklog::Worklog;

/// What has to change on Jira so it mirrors Toggl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub to_add: Vec<Worklog>,
    pub to_delete: Vec<Worklog>,
    pub matched: usize,
}

impl SyncPlan {
    pub fn operation_count(&self) -> usize {
        self.to_add.len() + self.to_delete.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operation_count() == 0
    }
}

/// Pairs each source worklog with the first unconsumed equivalent mirror
/// worklog, in input order. A mirror worklog is consumed at most once.
pub fn plan(source: &[Worklog], mirror: &[Worklog]) -> SyncPlan {
    let mut consumed = vec![false; mirror.len()];
    let mut to_add = Vec::new();
    let mut matched = 0;

    for wanted in source {
        let hit = mirror
            .iter()
            .enumerate()
            .find(|(index, existing)| !consumed[*index] && wanted.is_equivalent(existing))
            .map(|(index, _)| index);

        match hit {
            Some(index) => {
                consumed[index] = true;
                matched += 1;
            }
            None => to_add.push(wanted.clone()),
        }
    }

    let to_delete = mirror
        .iter()
        .zip(&consumed)
        .filter(|(_, taken)| !**taken)
        .map(|(worklog, _)| worklog.clone())
        .collect();

    SyncPlan {
        to_add,
        to_delete,
        matched,
    }
}
