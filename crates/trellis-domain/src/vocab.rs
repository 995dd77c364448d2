//! Well-known vocabulary IRIs

/// XML Schema datatypes
pub mod xsd {
    /// Namespace prefix
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";
    /// xsd:string
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    /// xsd:boolean
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    /// xsd:integer
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    /// xsd:long
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
    /// xsd:int
    pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";
    /// xsd:decimal
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    /// xsd:double
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    /// xsd:float
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
    /// xsd:dateTime
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
    /// xsd:anyURI
    pub const ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";
}

/// RDF core vocabulary
pub mod rdf {
    /// rdf:type
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// rdf:langString, the datatype of every language-tagged literal
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

/// OTTR template vocabulary
pub mod ottr {
    /// Namespace prefix
    pub const NS: &str = "http://ns.ottr.xyz/0.4/";
    /// The primitive triple-emitting base template
    pub const TRIPLE: &str = "http://ns.ottr.xyz/0.4/Triple";
    /// Compact form accepted wherever a template name is expected
    pub const TRIPLE_COMPACT: &str = "ottr:Triple";
}
