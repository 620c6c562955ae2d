use std::path::Path;

use codescope::extractor::{extract_context, ExtractorRegistry, SymbolExtractor};
use codescope::symbol::{Symbol, SymbolKind};

use crate::helpers::test_harness::{fixture, TestHarness};

fn named<'a>(symbols: &'a [Symbol], name: &str) -> &'a Symbol {
    symbols
        .iter()
        .find(|s| s.name == name)
        .unwrap_or_else(|| panic!("missing symbol {}", name))
}

#[test]
fn test_python_fixture_symbols() {
    let registry = ExtractorRegistry::new();
    let path = fixture("languages/python/sample_python.py");
    let symbols = registry.extract(&path);

    let imports: Vec<&str> = symbols
        .iter()
        .filter(|s| s.kind == SymbolKind::Import)
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(
        imports,
        vec![
            "logging",
            "dataclasses.dataclass",
            "dataclasses.field",
            "storage.Repository"
        ]
    );

    let order = named(&symbols, "Order");
    assert_eq!(order.kind, SymbolKind::Class);
    assert_eq!(order.line_number, 9);
    assert_eq!(order.annotations, vec!["dataclass"]);
    assert_eq!(order.doc.as_deref(), Some("A customer order."));

    let total = named(&symbols, "total");
    assert_eq!(total.kind, SymbolKind::Method);
    assert_eq!(total.parent_type.as_deref(), Some("Order"));
    assert_eq!(total.return_type.as_deref(), Some("float"));

    let service = named(&symbols, "OrderService");
    assert_eq!(service.extends, vec!["BaseService"]);

    let place = named(&symbols, "place");
    assert!(place.is_async);
    assert_eq!(place.line_number, 25);
    assert_eq!(place.parameters, vec!["self", "order"]);
    assert_eq!(place.parent_type.as_deref(), Some("OrderService"));

    assert_eq!(named(&symbols, "validate").annotations, vec!["staticmethod"]);

    let factory = named(&symbols, "create_service");
    assert_eq!(factory.kind, SymbolKind::Function);
    assert!(factory.parent_type.is_none());
    assert_eq!(factory.parameters, vec!["repository"]);
}

#[test]
fn test_java_fixture_symbols() {
    let registry = ExtractorRegistry::new();
    let path = fixture("languages/java/SampleJava.java");
    let symbols = registry.extract(&path);

    assert_eq!(named(&symbols, "com.example.orders").kind, SymbolKind::Package);
    assert_eq!(named(&symbols, "java.util.List").kind, SymbolKind::Import);

    let class = symbols
        .iter()
        .find(|s| s.kind == SymbolKind::Class)
        .expect("class");
    assert_eq!(class.name, "OrderRepository");
    assert_eq!(class.line_number, 9);
    assert_eq!(class.implements, vec!["Repository<Order>"]);
    assert_eq!(class.doc.as_deref(), Some("Keeps orders in memory."));

    let ctor = symbols
        .iter()
        .find(|s| s.kind == SymbolKind::Constructor)
        .expect("constructor");
    assert_eq!(ctor.line_number, 13);
    assert_eq!(ctor.parameters, vec!["capacity"]);

    let save = named(&symbols, "save");
    assert_eq!(save.kind, SymbolKind::Method);
    assert_eq!(save.line_number, 22);
    assert_eq!(save.modifiers, vec!["public", "synchronized"]);
    assert_eq!(save.annotations, vec!["Override"]);
    assert_eq!(
        save.doc.as_deref(),
        Some("Store an order. @param order the order to keep")
    );

    let orders = named(&symbols, "orders");
    assert_eq!(orders.kind, SymbolKind::Field);
    assert_eq!(orders.return_type.as_deref(), Some("List<Order>"));

    assert_eq!(named(&symbols, "findAll").return_type.as_deref(), Some("List<Order>"));
}

#[test]
fn test_unsupported_files_yield_nothing() {
    let harness = TestHarness::new().unwrap();
    let file = harness
        .create_test_file("web/app.ts", "export function main() {}\n")
        .unwrap();

    let registry = ExtractorRegistry::new();
    assert!(!registry.is_indexable(&file));
    assert!(registry.extract(&file).is_empty());
    assert!(registry.for_path(&file).find_usages("main", &file).is_empty());
}

#[test]
fn test_broken_python_degrades_to_empty() {
    let harness = TestHarness::new().unwrap();
    let file = harness
        .create_test_file("broken.py", "def ok():\n    pass\n\ndef broken(:\n")
        .unwrap();

    let registry = ExtractorRegistry::new();
    assert!(registry.extract(&file).is_empty());
}

#[test]
fn test_usages_are_whole_identifiers() {
    let harness = TestHarness::new().unwrap();
    let py = harness
        .create_test_file("calc.py", "def rate():\n    return 1\n\nrated = rate()\nfirst_rate = 2\n")
        .unwrap();
    let java = harness
        .create_test_file("Calc.java", "int rate = 1;\nint rates = rate + 1;\n")
        .unwrap();

    let registry = ExtractorRegistry::new();
    assert_eq!(registry.for_path(&py).find_usages("rate", &py), vec![4]);
    assert_eq!(registry.for_path(&java).find_usages("rate", &java), vec![1, 2]);
}

#[test]
fn test_context_on_single_line_file() {
    let harness = TestHarness::new().unwrap();
    let file = harness.create_test_file("one.py", "VALUE = 1\n").unwrap();

    let window = extract_context(&file, 1, 3);
    assert!(window.before.is_empty());
    assert_eq!(window.line, "VALUE = 1");
    assert!(window.after.is_empty());

    let missing = extract_context(Path::new("/no/such/file.py"), 1, 3);
    assert!(missing.is_empty());
}
