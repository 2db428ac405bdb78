//! Static query corpora used across harnesses.
//!
//! Each corpus is a `&'static [&'static str]`. Canonical queries are written
//! exactly as the serializer spells them, so they double as round-trip
//! fixtures.

/// Well-formed terms in canonical spelling, one per grammar shape.
pub const CANONICAL_TERMS: &[&str] = &[
    "tax_tree(2759)",
    "tax_tree(!2759)",
    "tax_name(Homo sapiens[human])",
    "tax_rank(species)",
    "collate(sequence_id, name)",
    "assembly_span>=100000000",
    "assembly_span<1G",
    "max(assembly_span)>=3G",
    "bioproject=PRJEB40655,!PRJEB40656",
    "assembly_level!=contig",
    "length(bioproject)>2",
    "gc_percent",
];

/// Full queries as they arrive from URLs and search history.
pub const QUERIES: &[&str] = &[
    "tax_tree(2759) AND assembly_span>=100000000 AND bioproject=PRJEB40655,!PRJEB40656",
    "assembly_span=100000000 AND tax_tree(2759) AND assembly_span=100M",
    "bioproject=PRJEB40655,null and bioproject=null,prjeb40655",
    "tax_name(Homo sapiens) AND tax_rank(species) AND gc_percent<=40",
    "collate(sequence_id,name) AND assembly_level=chromosome,scaffold",
    "AND AND",
    "",
];

/// Terms that parse but fail validation against the small registry, with a
/// fragment of the expected reason.
pub const INVALID_TERMS: &[(&str, &str)] = &[
    ("wingspan=3", "wingspan"),
    ("assembly_span=3.5", "integer"),
    ("assembly_span>=-1", "minimum"),
    ("gc_percent>101", "maximum"),
    ("assembly_level=plasmid", "plasmid"),
    ("assembly_level>contig", "operator"),
    ("tax_genus(Homo)", "genus"),
    ("tax_tree()", "value"),
    ("median(gc_percent)=40", "median"),
];
