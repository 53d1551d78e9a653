//! Comprehensive tests for valet-bind
//!
//! Scanning, reading, writing and engine behavior on parsed documents.

use valet_bind::{
    AccessorRegistry, BindConfig, BindError, FieldValue, ID_FIELD, MarkerNames, Page, Record,
    TYPE_FIELD, TreeScanner, read_scope, write_scope,
};
use valet_dom::{Document, NodeId};
use valet_html::{HtmlSerializer, parse};

fn by_id(doc: &Document, id: &str) -> NodeId {
    doc.get_element_by_id(id).unwrap()
}

fn html_of(doc: &Document) -> String {
    HtmlSerializer::new().serialize_inner(doc.tree(), doc.tree().root())
}

const DEEP: &str = r#"
    <div id="root">
      <div itemscope itemid="s1">
        <span itemprop="a">1</span>
        <div itemscope itemid="s1-inner"><span itemprop="a">inner</span></div>
        <div itemprop="friend" itemscope itemid="s1-friend">
          <span itemprop="a">friend</span>
        </div>
      </div>
      <ul>
        <li><p itemscope itemid="s2"><i itemprop="b">2</i></p></li>
        <li>
          <section>
            <div itemscope itemid="s3">
              <b itemprop="c">3</b>
              <div><div itemscope itemid="s3-inner"><b itemprop="c">x</b></div></div>
            </div>
          </section>
        </li>
      </ul>
    </div>"#;

// ============================================================================
// TREE SCANNER
// ============================================================================

#[test]
fn test_scopes_never_nested_under_each_other() {
    let doc = parse(DEEP).unwrap();
    let tree = doc.tree();
    let markers = MarkerNames::default();
    let scopes = TreeScanner::new(&markers).scopes(tree, by_id(&doc, "root"));

    assert_eq!(scopes.len(), 3);
    for &scope in &scopes {
        for &other in &scopes {
            if scope != other {
                assert!(!tree.is_inclusive_ancestor(other, scope));
            }
        }
    }
}

#[test]
fn test_scopes_in_document_order() {
    let doc = parse(DEEP).unwrap();
    let markers = MarkerNames::default();
    let scopes = TreeScanner::new(&markers).scopes(doc.tree(), by_id(&doc, "root"));
    let ids: Vec<_> = scopes
        .iter()
        .map(|&s| doc.tree().get_attribute(s, "itemid").unwrap())
        .collect();
    assert_eq!(ids, vec!["s1", "s2", "s3"]);
}

#[test]
fn test_properties_never_inside_nested_scope() {
    let doc = parse(DEEP).unwrap();
    let tree = doc.tree();
    let markers = MarkerNames::default();
    let scanner = TreeScanner::new(&markers);
    let root = by_id(&doc, "root");

    for scope in scanner.scopes(tree, root) {
        for property in scanner.properties(tree, scope) {
            // The nearest scope strictly above the property must be `scope`.
            let owner = tree
                .ancestors(property)
                .find(|&a| tree.has_attribute(a, "itemscope"));
            assert_eq!(owner, Some(scope));
        }
    }
}

#[test]
fn test_property_that_is_scope_is_reported() {
    let doc = parse(DEEP).unwrap();
    let markers = MarkerNames::default();
    let scanner = TreeScanner::new(&markers);
    let s1 = doc
        .tree()
        .descendant_elements(by_id(&doc, "root"))
        .find(|&n| doc.tree().get_attribute(n, "itemid") == Some("s1"))
        .unwrap();

    let names: Vec<_> = scanner
        .properties(doc.tree(), s1)
        .into_iter()
        .filter_map(|p| scanner.property_name(doc.tree(), p))
        .collect();
    assert_eq!(names, vec!["a", "friend"]);
}

// ============================================================================
// READ / WRITE
// ============================================================================

#[test]
fn test_multi_valued_accumulation_keeps_order() {
    let doc = parse(
        r#"<div id="s" itemscope>
             <span itemprop="tag">a</span>
             <span itemprop="tag">b</span>
             <span itemprop="tag">c</span>
           </div>"#,
    )
    .unwrap();
    let record = read_scope(
        doc.tree(),
        by_id(&doc, "s"),
        &BindConfig::default(),
        &AccessorRegistry::new(),
    );
    assert_eq!(record.get("tag"), Some(&FieldValue::from(vec!["a", "b", "c"])));
}

#[test]
fn test_round_trip_is_idempotent() {
    let mut doc = parse(
        r#"<form id="s" itemscope itemid="e1" itemtype="Event">
             <h1 itemprop="title">Launch</h1>
             <time itemprop="start" datetime="2024-05-01">May 1</time>
             <a itemprop="url" href="/launch">details</a>
             <input itemprop="seats" value="40">
             <meta itemprop="lang" content="en">
           </form>"#,
    )
    .unwrap();
    let scope = by_id(&doc, "s");
    let config = BindConfig::default();
    let accessors = AccessorRegistry::new();

    let before_html = html_of(&doc);
    let record = read_scope(doc.tree(), scope, &config, &accessors);
    write_scope(doc.tree_mut(), scope, &record, &config, &accessors).unwrap();

    assert_eq!(html_of(&doc), before_html);
    assert_eq!(read_scope(doc.tree(), scope, &config, &accessors), record);
    assert_eq!(record.first("seats"), Some("40"));
    assert_eq!(record.first("start"), Some("2024-05-01"));
}

#[test]
fn test_write_is_total() {
    let mut doc = parse(
        r#"<div id="s" itemscope>
             <span itemprop="name">Alice</span>
             <span itemprop="email">alice@example.com</span>
           </div>"#,
    )
    .unwrap();
    let scope = by_id(&doc, "s");
    let config = BindConfig::default();
    let accessors = AccessorRegistry::new();

    write_scope(doc.tree_mut(), scope, &Record::new().with("name", "Bob"), &config, &accessors)
        .unwrap();

    let record = read_scope(doc.tree(), scope, &config, &accessors);
    assert_eq!(record.first("name"), Some("Bob"));
    assert!(!record.contains("email"));
    assert_eq!(doc.tree().text_content(scope).split_whitespace().collect::<Vec<_>>(), vec!["Bob"]);
}

#[test]
fn test_read_mixed_content_keeps_spacing() {
    let doc = parse(
        r#"<div id="s" itemscope>
             <span itemprop="name"><b>Ada</b> <i>Lovelace</i></span>
             <p itemprop="bio">Wrote the <em>first</em> program.</p>
           </div>"#,
    )
    .unwrap();
    let record = read_scope(
        doc.tree(),
        by_id(&doc, "s"),
        &BindConfig::default(),
        &AccessorRegistry::new(),
    );

    assert_eq!(record.first("name"), Some("Ada Lovelace"));
    assert_eq!(record.first("bio"), Some("Wrote the first program."));
}

// ============================================================================
// ENGINE
// ============================================================================

#[test]
fn test_get_after_set_without_scope() {
    let mut page = Page::new(parse(r#"<div id="host"></div>"#).unwrap());
    let host = by_id(page.document(), "host");
    let engine = page.attach(host, BindConfig::default());

    let value = Record::new()
        .with(ID_FIELD, "q9")
        .with("tags", vec!["x", "y"]);
    page.set(engine, "q9", value.clone()).unwrap();
    assert_eq!(page.get(engine, "q9").unwrap(), Some(&value));
}

#[test]
fn test_duplicate_ids_later_scope_wins() {
    let mut page = Page::new(
        parse(
            r#"<div id="host">
                 <div id="first" itemscope itemid="x"><span itemprop="v">A</span></div>
                 <div id="second" itemscope itemid="x"><span itemprop="v">B</span></div>
               </div>"#,
        )
        .unwrap(),
    );
    let host = by_id(page.document(), "host");
    let engine = page.attach(host, BindConfig::default());

    assert_eq!(page.get(engine, "x").unwrap().and_then(|r| r.first("v")), Some("B"));

    page.set(engine, "x", Record::new().with("v", "C")).unwrap();
    let doc = page.document();
    assert_eq!(doc.tree().text_content(by_id(doc, "first")), "A");
    assert_eq!(doc.tree().text_content(by_id(doc, "second")), "C");
}

#[test]
fn test_person_end_to_end() {
    let mut page = Page::new(
        parse(
            r#"<main>
                 <activity-sub id="sub"></activity-sub>
                 <div id="person" itemscope itemid="p1" itemtype="Person">
                   <span id="name" itemprop="name">Alice</span>
                   <a id="homepage" itemprop="homepage" href="http://example.com">home</a>
                 </div>
               </main>"#,
        )
        .unwrap(),
    );
    let host = by_id(page.document(), "sub");
    let engine = page.attach(host, BindConfig::default());
    page.bind(engine, "@parent").unwrap();

    let expected = Record::new()
        .with(ID_FIELD, "p1")
        .with(TYPE_FIELD, "Person")
        .with("name", "Alice")
        .with("homepage", "http://example.com");
    assert_eq!(page.get(engine, "p1").unwrap(), Some(&expected));
    assert_eq!(
        serde_json::to_value(&expected).unwrap(),
        serde_json::json!({
            "@id": "p1",
            "@type": "Person",
            "name": "Alice",
            "homepage": "http://example.com"
        })
    );

    let update: Record =
        serde_json::from_str(r#"{"@id":"p1","name":"Bob"}"#).unwrap();
    page.set(engine, "p1", update).unwrap();

    let doc = page.document();
    assert_eq!(doc.tree().text_content(by_id(doc, "name")), "Bob");
    assert_eq!(doc.tree().get_attribute(by_id(doc, "homepage"), "href"), Some(""));
    assert_eq!(doc.tree().get_attribute(by_id(doc, "person"), "itemid"), Some("p1"));
}

#[test]
fn test_bind_parent_and_missing_id() {
    let mut page = Page::new(
        parse(r#"<section id="parent"><activity-sub id="sub"></activity-sub></section>"#).unwrap(),
    );
    let host = by_id(page.document(), "sub");
    let parent = by_id(page.document(), "parent");
    let engine = page.attach(host, BindConfig::default());

    assert_eq!(page.bind(engine, "@parent"), Ok(parent));
    assert_eq!(page.engine(engine).unwrap().root(), parent);

    let err = page.bind(engine, "missing-id").unwrap_err();
    assert!(matches!(err, BindError::Resolution { ref target } if target == "missing-id"));
    assert_eq!(page.engine(engine).unwrap().root(), host);
}
