use todo_core::{
    project, render_html, DateLocale, Filter, MemoryStorage, Projection, RenderConfig,
    StoreConfig, TodoStore,
};

fn store_with(texts: &[&str]) -> TodoStore<MemoryStorage> {
    let mut store = TodoStore::new(MemoryStorage::new(), StoreConfig::default());
    for text in texts {
        store.create(text, "2024-01-15").unwrap();
    }
    store
}

#[test]
fn script_text_is_escaped_in_rows_but_raw_in_storage() {
    let store = store_with(&["<script>alert(1)</script>", r#"Tom & "Jerry's""#]);

    let projection = project(store.items(), Filter::All, &RenderConfig::default());
    let rows = projection.rows();
    assert_eq!(rows[0].text, "&lt;script&gt;alert(1)&lt;/script&gt;");
    assert_eq!(rows[1].text, "Tom &amp; &quot;Jerry&#039;s&quot;");
    for row in rows {
        assert!(!row.text.contains(['<', '>', '"', '\'']));
    }

    assert_eq!(store.items()[0].text, "<script>alert(1)</script>");
    let html = render_html(&projection);
    assert!(!html.contains("<script>"));
}

#[test]
fn empty_filter_result_is_distinct_placeholder_state() {
    let store = store_with(&["Buy milk"]);

    let completed = project(store.items(), Filter::Completed, &RenderConfig::default());
    assert_eq!(
        completed,
        Projection::Empty {
            message: "No todos available".to_string()
        }
    );
    assert!(completed.is_empty());

    let nothing_loaded = project(&[], Filter::All, &RenderConfig::default());
    assert!(nothing_loaded.is_empty());
    assert!(render_html(&nothing_loaded).contains("No todos available"));
}

#[test]
fn rows_follow_insertion_order_and_filter() {
    let mut store = store_with(&["first", "second", "third"]);
    let second_id = store.items()[1].id;
    store.toggle(second_id).unwrap();

    let pending = project(store.items(), Filter::Pending, &RenderConfig::default());
    let texts = pending
        .rows()
        .iter()
        .map(|row| row.text.as_str())
        .collect::<Vec<_>>();
    assert_eq!(texts, vec!["first", "third"]);

    let completed = project(store.items(), Filter::Completed, &RenderConfig::default());
    assert_eq!(completed.rows().len(), 1);
    assert_eq!(completed.rows()[0].id, second_id);
    assert!(completed.rows()[0].completed);
}

#[test]
fn dates_follow_configured_locale() {
    let store = store_with(&["Buy milk"]);

    let indonesian = project(store.items(), Filter::All, &RenderConfig::default());
    assert_eq!(indonesian.rows()[0].date, "15 Jan 2024");

    let config = RenderConfig {
        locale: DateLocale::EnglishUs,
        ..RenderConfig::default()
    };
    let english = project(store.items(), Filter::All, &config);
    assert_eq!(english.rows()[0].date, "Jan 15, 2024");
}

#[test]
fn projection_is_deterministic() {
    let store = store_with(&["a", "b"]);
    let config = RenderConfig::default();
    assert_eq!(
        project(store.items(), Filter::All, &config),
        project(store.items(), Filter::All, &config)
    );
}

#[test]
fn scenario_ends_with_placeholder_after_delete() {
    let mut store = store_with(&["Buy milk"]);
    let id = store.items()[0].id;
    store.toggle(id).unwrap();
    store.delete(id).unwrap();

    let html = render_html(&project(store.items(), Filter::All, &RenderConfig::default()));
    assert_eq!(html, r#"<p class="todo-empty">No todos available</p>"#);
}
