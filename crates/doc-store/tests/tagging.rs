use pretty_assertions::assert_eq;
use std::sync::Arc;
use taggable_core::{Document, NewDocument, Scope, TagFrequency, TaggedCollection, Taggable};
use taggable_doc_store::MemoryStore;

fn users() -> TaggedCollection<Arc<MemoryStore>> {
    TaggedCollection::new(Arc::new(MemoryStore::new()), "users")
}

async fn create(users: &TaggedCollection<Arc<MemoryStore>>, name: &str, tags: &str) -> Document {
    users
        .create(NewDocument::new().with_field("name", name).with_tag_list(tags))
        .await
        .unwrap()
}

fn ids(documents: &[Document]) -> Vec<u64> {
    let mut ids: Vec<u64> = documents.iter().map(|d| d.id.0).collect();
    ids.sort_unstable();
    ids
}

#[tokio::test]
async fn tagged_with_finds_single_and_multiple_tags() {
    let users = users();
    let tuquito = create(&users, "Tuquito", "linux, tucuman, free software").await;

    assert_eq!(users.tagged_with("linux").await.unwrap().first(), Some(&tuquito));
    assert_eq!(
        users
            .tagged_with(vec!["tucuman", "free software"])
            .await
            .unwrap()
            .first(),
        Some(&tuquito)
    );
}

#[tokio::test]
async fn tagged_with_returns_every_matching_record() {
    let users = users();
    let tuquito = create(&users, "Tuquito", "linux, tucuman, free software").await;
    let ubuntu = create(&users, "ubuntu", "linux").await;

    let found = users.tagged_with("linux").await.unwrap();
    assert!(found.contains(&tuquito));
    assert!(found.contains(&ubuntu));
}

#[tokio::test]
async fn query_string_with_comma_matches_stored_tag() {
    let users = users();
    let mut player = create(&users, "player", "").await;
    player.set_tags(vec!["rock, paper"]);
    users.save(&player).await.unwrap();

    assert_eq!(ids(&users.tagged_with("rock, paper").await.unwrap()), vec![player.id.0]);
    assert_eq!(ids(&users.tagged_with_all("rock, paper").await.unwrap()), vec![player.id.0]);
    assert!(users.tagged_with("rock").await.unwrap().is_empty());
    assert!(users.tagged_without("rock, paper").await.unwrap().is_empty());
}

#[tokio::test]
async fn tagged_without_excludes_tagged_records() {
    let users = users();
    let tuquito = create(&users, "Tuquito", "linux, tucuman, free software").await;
    assert!(users.tagged_without("linux").await.unwrap().is_empty());

    let ubuntu = create(&users, "ubuntu", "linux").await;
    let found = users.tagged_without("tucuman").await.unwrap();
    assert!(!found.contains(&tuquito));
    assert!(found.contains(&ubuntu));
    assert!(users.tagged_without("linux").await.unwrap().is_empty());
}

#[tokio::test]
async fn tagged_with_all_requires_every_tag() {
    let users = users();
    let tuquito = create(&users, "Tuquito", "linux, tucuman, free software").await;
    let jane = create(&users, "Jane Doe", "linux, foo, bar").await;

    assert_eq!(users.tagged_with_all(vec!["foo", "linux"]).await.unwrap(), vec![jane.clone()]);
    assert_eq!(
        ids(&users.tagged_with_all("linux").await.unwrap()),
        ids(&[tuquito.clone(), jane.clone()])
    );
    assert_eq!(
        ids(&users.tagged_with_all(vec!["linux"]).await.unwrap()),
        ids(&[tuquito, jane])
    );
    assert!(users.tagged_with_all(Vec::<String>::new()).await.unwrap().is_empty());
    assert!(users.tagged_with_all(vec!["foo", "tucuman"]).await.unwrap().is_empty());
}

#[tokio::test]
async fn all_tags_counts_records_per_tag() {
    let users = users();
    create(&users, "Tuquito", "linux, tucuman, free software").await;
    create(&users, "ubuntu", "linux").await;

    assert_eq!(
        users.all_tags(&Scope::new()).await.unwrap(),
        vec![
            TagFrequency::new("free software", 1),
            TagFrequency::new("linux", 2),
            TagFrequency::new("tucuman", 1),
        ]
    );
}

#[tokio::test]
async fn tag_list_lists_distinct_tags_of_the_collection() {
    let users = users();
    create(&users, "Tuquito", "linux, tucuman, free software").await;
    create(&users, "ubuntu", "linux").await;

    let mut expected = vec!["linux", "tucuman", "free software"];
    expected.sort_unstable();
    let mut tags = users.tag_list().await.unwrap();
    tags.sort();
    assert_eq!(tags, expected);
}

#[tokio::test]
async fn collections_do_not_see_each_other() {
    let store = Arc::new(MemoryStore::new());
    let users = TaggedCollection::new(store.clone(), "users");
    let organizations = TaggedCollection::new(store, "organizations");
    create(&users, "Tuquito", "linux").await;

    assert!(organizations.tag_list().await.unwrap().is_empty());
    assert!(organizations.tagged_with("linux").await.unwrap().is_empty());
}

#[tokio::test]
async fn saved_tag_changes_are_visible_to_queries() {
    let users = users();
    let mut tuquito = create(&users, "Tuquito", "linux").await;

    tuquito.set_tags(vec!["windows"]);
    users.save(&tuquito).await.unwrap();

    assert!(users.tagged_with("linux").await.unwrap().is_empty());
    assert_eq!(users.tagged_with("windows").await.unwrap(), vec![tuquito]);
}

mod scoped {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Fixture {
        users: TaggedCollection<Arc<MemoryStore>>,
        organization_1: Document,
        organization_2: Document,
        user_1: Document,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let organizations = TaggedCollection::new(store.clone(), "organizations");
        let users = TaggedCollection::new(store, "users");

        let organization_1 = organizations
            .create(NewDocument::new().with_field("name", "Qualica"))
            .await
            .unwrap();
        let members = users.within(&Scope::new().with("organization_id", organization_1.id.0));
        let user_1 = create(&members, "User1", "ubuntu, linux, tucuman").await;
        create(&members, "User2", "ubuntu, linux, tucuman").await;

        let organization_2 = organizations
            .create(NewDocument::new().with_field("name", "Microsoft"))
            .await
            .unwrap();
        let members = users.within(&Scope::new().with("organization_id", organization_2.id.0));
        create(&members, "User3", "microsoft, windows, tucuman").await;
        create(&members, "User4", "ubuntu, linux, tucuman").await;

        Fixture {
            users,
            organization_1,
            organization_2,
            user_1,
        }
    }

    #[tokio::test]
    async fn all_tags_with_one_scope_field() {
        let f = fixture().await;

        let results = f
            .users
            .all_tags(&Scope::new().with("organization_id", f.organization_1.id.0))
            .await
            .unwrap();
        assert_eq!(
            results,
            vec![
                TagFrequency::new("linux", 2),
                TagFrequency::new("tucuman", 2),
                TagFrequency::new("ubuntu", 2),
            ]
        );

        let results = f
            .users
            .all_tags(&Scope::new().with("organization_id", f.organization_2.id.0))
            .await
            .unwrap();
        assert_eq!(
            results,
            vec![
                TagFrequency::new("linux", 1),
                TagFrequency::new("microsoft", 1),
                TagFrequency::new("tucuman", 2),
                TagFrequency::new("ubuntu", 1),
                TagFrequency::new("windows", 1),
            ]
        );
    }

    #[tokio::test]
    async fn all_tags_with_several_scope_fields() {
        let f = fixture().await;
        let user_1_name = f.user_1.field("name").unwrap();

        let results = f
            .users
            .all_tags(
                &Scope::new()
                    .with("organization_id", f.organization_1.id.0)
                    .with("name", user_1_name),
            )
            .await
            .unwrap();
        assert_eq!(
            results,
            vec![
                TagFrequency::new("linux", 1),
                TagFrequency::new("tucuman", 1),
                TagFrequency::new("ubuntu", 1),
            ]
        );
    }

    #[tokio::test]
    #[allow(deprecated)]
    async fn scoped_tags_matches_all_tags() {
        let f = fixture().await;
        let scope = Scope::new().with("organization_id", f.organization_1.id.0);
        assert_eq!(
            f.users.scoped_tags(&scope).await.unwrap(),
            f.users.all_tags(&scope).await.unwrap()
        );
    }

    #[tokio::test]
    async fn scoped_tables_sum_to_the_unscoped_table() {
        let f = fixture().await;
        let mut combined = std::collections::BTreeMap::new();
        for organization in [&f.organization_1, &f.organization_2] {
            let scope = Scope::new().with("organization_id", organization.id.0);
            for entry in f.users.all_tags(&scope).await.unwrap() {
                *combined.entry(entry.name).or_insert(0) += entry.count;
            }
        }

        let unscoped: Vec<(String, usize)> = f
            .users
            .all_tags(&Scope::new())
            .await
            .unwrap()
            .into_iter()
            .map(|entry| (entry.name, entry.count))
            .collect();
        assert_eq!(combined.into_iter().collect::<Vec<_>>(), unscoped);
    }

    #[tokio::test]
    async fn scoped_collection_restricts_tag_queries() {
        let f = fixture().await;
        let members = f
            .users
            .within(&Scope::new().with("organization_id", f.organization_2.id.0));

        let names: Vec<_> = members
            .tagged_with("ubuntu")
            .await
            .unwrap()
            .iter()
            .filter_map(|d| d.field("name"))
            .collect();
        assert_eq!(names, vec![serde_json::json!("User4")]);
        assert_eq!(members.tagged_without("ubuntu").await.unwrap().len(), 1);
        assert_eq!(members.tagged_with_all("tucuman").await.unwrap().len(), 2);
    }
}
