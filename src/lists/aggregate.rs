use std::collections::HashMap;

use super::model::{AggregatedData, List, ListWithMembers, Profile, ProfileList};
use crate::bsky::types::{record_key, ProfileView};

/// Merge follows and owned lists into one view keyed by DID.
///
/// Followed accounts come first in follow order. Accounts that only appear
/// as list members are appended in the order their memberships are first
/// encountered (lists in order, then members in order).
pub fn aggregate_data(follows: &[ProfileView], lists: &[ListWithMembers]) -> AggregatedData {
    // did -> index into `profiles`
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(follows.len());
    let mut profiles: Vec<Profile> = Vec::with_capacity(follows.len());

    for follow in follows {
        if index.contains_key(follow.did.as_str()) {
            continue;
        }
        index.insert(follow.did.as_str(), profiles.len());
        profiles.push(Profile::from_view(follow, true));
    }

    let catalogue: Vec<List> = lists
        .iter()
        .map(|list| List {
            name: list.name.clone(),
            purpose: list.purpose.clone(),
            uri: list.uri.clone(),
        })
        .collect();

    for list in lists {
        for member in &list.members {
            let membership = ProfileList {
                name: list.name.clone(),
                uri: list.uri.clone(),
                item_uri: member.uri.clone(),
                item_rkey: record_key(&member.uri).to_string(),
            };

            match index.get(member.subject.did.as_str()) {
                Some(&i) => {
                    let profile = &mut profiles[i];
                    if !profile.is_in_list(&list.uri) {
                        profile.lists.push(membership);
                    }
                }
                None => {
                    let mut profile = Profile::from_view(&member.subject, false);
                    profile.lists.push(membership);
                    index.insert(member.subject.did.as_str(), profiles.len());
                    profiles.push(profile);
                }
            }
        }
    }

    tracing::debug!(
        profiles = profiles.len(),
        lists = catalogue.len(),
        "aggregated follows and lists"
    );

    AggregatedData {
        profiles,
        lists: catalogue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsky::types::{ListItemView, ViewerState};

    fn view(did: &str, handle: &str) -> ProfileView {
        ProfileView {
            did: did.to_string(),
            handle: handle.to_string(),
            display_name: None,
            avatar: None,
            description: None,
            viewer: None,
        }
    }

    fn item(uri: &str, subject: ProfileView) -> ListItemView {
        ListItemView {
            uri: uri.to_string(),
            subject,
        }
    }

    fn list(name: &str, uri: &str, members: Vec<ListItemView>) -> ListWithMembers {
        ListWithMembers {
            name: name.to_string(),
            uri: uri.to_string(),
            purpose: Some("app.bsky.graph.defs#curatelist".to_string()),
            members,
        }
    }

    #[test]
    fn test_followed_member_gets_membership() {
        let follows = vec![view("A", "a")];
        let lists = vec![list(
            "L1",
            "list://x/L1",
            vec![item("rec://owner/listitem/r1", view("A", "a"))],
        )];

        let data = aggregate_data(&follows, &lists);

        assert_eq!(data.profiles.len(), 1);
        let a = &data.profiles[0];
        assert_eq!(a.did, "A");
        assert!(a.following);
        assert_eq!(
            a.lists,
            vec![ProfileList {
                name: "L1".to_string(),
                uri: "list://x/L1".to_string(),
                item_uri: "rec://owner/listitem/r1".to_string(),
                item_rkey: "r1".to_string(),
            }]
        );
    }

    #[test]
    fn test_list_only_member_is_synthesized() {
        let lists = vec![list(
            "L1",
            "list://x/L1",
            vec![item("rec://owner/listitem/r9", view("B", "b"))],
        )];

        let data = aggregate_data(&[], &lists);

        assert_eq!(data.profiles.len(), 1);
        let b = &data.profiles[0];
        assert_eq!(b.did, "B");
        assert_eq!(b.handle, "b");
        assert!(!b.following);
        assert_eq!(b.lists.len(), 1);
        assert_eq!(b.lists[0].item_rkey, "r9");
    }

    #[test]
    fn test_order_follows_first_then_discovery_order() {
        let follows = vec![view("F1", "f1"), view("F2", "f2")];
        let lists = vec![
            list(
                "L1",
                "at://me/app.bsky.graph.list/1",
                vec![
                    item("at://me/app.bsky.graph.listitem/a", view("X", "x")),
                    item("at://me/app.bsky.graph.listitem/b", view("F2", "f2")),
                ],
            ),
            list(
                "L2",
                "at://me/app.bsky.graph.list/2",
                vec![
                    item("at://me/app.bsky.graph.listitem/c", view("Y", "y")),
                    item("at://me/app.bsky.graph.listitem/d", view("X", "x")),
                ],
            ),
        ];

        let data = aggregate_data(&follows, &lists);

        let order: Vec<&str> = data.profiles.iter().map(|p| p.did.as_str()).collect();
        assert_eq!(order, vec!["F1", "F2", "X", "Y"]);

        let x = &data.profiles[2];
        let x_lists: Vec<&str> = x.lists.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(x_lists, vec!["L1", "L2"]);
        assert!(data.profiles[0].lists.is_empty());
    }

    #[test]
    fn test_catalogue_projects_every_list() {
        let lists = vec![
            list("Empty", "at://me/app.bsky.graph.list/e", vec![]),
            list(
                "Full",
                "at://me/app.bsky.graph.list/f",
                vec![item("at://me/app.bsky.graph.listitem/z", view("Z", "z"))],
            ),
        ];

        let data = aggregate_data(&[], &lists);

        assert_eq!(data.lists.len(), 2);
        assert_eq!(data.lists[0].name, "Empty");
        assert_eq!(data.lists[1].purpose.as_deref(), Some("app.bsky.graph.defs#curatelist"));
        for profile in &data.profiles {
            for m in &profile.lists {
                assert!(data.list(&m.uri).is_some());
                assert_eq!(m.item_rkey, m.item_uri.rsplit('/').next().unwrap());
            }
        }
    }

    #[test]
    fn test_followed_by_comes_from_viewer_state() {
        let mut follower = view("A", "a");
        follower.viewer = Some(ViewerState {
            following: Some("at://me/app.bsky.graph.follow/1".into()),
            followed_by: Some("at://a/app.bsky.graph.follow/2".into()),
        });
        let mut stranger = view("B", "b");
        stranger.viewer = Some(ViewerState {
            following: None,
            followed_by: Some("at://b/app.bsky.graph.follow/3".into()),
        });
        let lists = vec![list(
            "L",
            "at://me/app.bsky.graph.list/l",
            vec![item("at://me/app.bsky.graph.listitem/q", stranger)],
        )];

        let data = aggregate_data(&[follower], &lists);

        assert!(data.profiles[0].followed_by);
        assert!(data.profiles[1].followed_by);
        assert!(!data.profiles[1].following);
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let follows = vec![view("A", "a"), view("B", "b")];
        let lists = vec![list(
            "L",
            "at://me/app.bsky.graph.list/l",
            vec![
                item("at://me/app.bsky.graph.listitem/1", view("C", "c")),
                item("at://me/app.bsky.graph.listitem/2", view("A", "a")),
            ],
        )];
        assert_eq!(aggregate_data(&follows, &lists), aggregate_data(&follows, &lists));
    }
}
