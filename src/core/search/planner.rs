//! Query planning and execution
//!
//! Turns request parameters into tantivy queries over one index
//! generation, ranks the matches and reads back the projected
//! documents. Planner settings are fixed at construction.

use std::cmp::Ordering as CmpOrdering;
use std::collections::BTreeMap;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tantivy::collector::TopDocs;
use tantivy::query::{
    AllQuery, BooleanQuery, BoostQuery, DisjunctionMaxQuery, Occur, PhrasePrefixQuery,
    PhraseQuery, Query, TermQuery,
};
use tantivy::schema::{Field, IndexRecordOption, Value};
use tantivy::{DocAddress, Searcher, TantivyDocument, Term};
use tracing::debug;
use uuid::Uuid;

use super::completion::SuggestField;
use super::index::IndexGeneration;
use super::projector::VerseDocument;
use super::query::{parse_simple_query, Operator, QueryNode};
use super::schema::POSITION_FIELD;
use super::tokenizer;
use crate::core::config::SearchConfig;
use crate::core::error::{FurqanError, Result};

/// Terms a prefix may expand to
const PREFIX_EXPANSIONS: u32 = 10_000;

/// `<field>__<suggester>` suggest parameter
static SUGGEST_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z_]+?)__([a-z_]+)$").expect("valid suggest pattern"));

/// Immutable planner configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerSettings {
    pub text_boost: f32,
    pub clean_text_boost: f32,
    pub default_operator: Operator,
    pub completion_cap: usize,
    pub max_query_length: usize,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            text_boost: 4.0,
            clean_text_boost: 2.0,
            default_operator: Operator::And,
            completion_cap: 5,
            max_query_length: 500,
        }
    }
}

impl PlannerSettings {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            text_boost: config.text_boost,
            clean_text_boost: config.clean_text_boost,
            default_operator: Operator::And,
            completion_cap: config.completion_cap,
            max_query_length: config.max_query_length,
        }
    }
}

/// Sortable result fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Chapter,
    Number,
    Score,
}

impl OrderField {
    pub const ALL: [OrderField; 3] = [OrderField::Chapter, OrderField::Number, OrderField::Score];

    pub fn name(&self) -> &'static str {
        match self {
            OrderField::Chapter => "chapter",
            OrderField::Number => "number",
            OrderField::Score => "score",
        }
    }

    /// Field for a name; `sora` is accepted for `chapter`
    fn from_name(name: &str) -> Option<Self> {
        if name == "sora" {
            return Some(OrderField::Chapter);
        }
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    fn valid_names() -> Vec<String> {
        Self::ALL.iter().map(|f| f.name().to_string()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderKey {
    pub field: OrderField,
    pub descending: bool,
}

/// Map common aliases to a sortable field
fn suggest_order_alias(name: &str) -> Option<&'static str> {
    match name {
        "surah" | "chapter_number" | "chapter__number" => Some("chapter"),
        "aya" | "aya_no" | "ayah" | "verse" | "verse_number" => Some("number"),
        "relevance" | "_score" | "rank" => Some("score"),
        _ => OrderField::ALL
            .iter()
            .map(|f| f.name())
            .find(|valid| valid.starts_with(name) || name.starts_with(valid)),
    }
}

/// Map common aliases to a completion field
fn suggest_completion_alias(name: &str) -> Option<&'static str> {
    match name {
        "text" | "aya_text_emlaey" | "clean" | "cleantext" => Some("clean_text"),
        "surah" | "chapter_name" | "clean_name_ar" => Some("chapter"),
        _ => None,
    }
}

/// Parse an `ordering` parameter such as `chapter,-number,score`
///
/// An absent or blank value keeps the default corpus order.
pub fn parse_ordering(raw: Option<&str>) -> Result<Vec<OrderKey>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    let mut keys = Vec::new();
    for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (descending, name) = match item.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, item),
        };
        let field = OrderField::from_name(name).ok_or_else(|| FurqanError::InvalidQueryField {
            field: name.to_string(),
            message: "cannot order by this field".to_string(),
            valid_fields: OrderField::valid_names(),
            suggestion: suggest_order_alias(name).map(str::to_string),
        })?;
        keys.push(OrderKey { field, descending });
    }
    Ok(keys)
}

/// Search parameters taken from the request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    /// Weighted multi-field match
    pub search: Option<String>,
    /// Boolean phrase query
    pub simple_query: Option<String>,
    pub ordering: Option<String>,
}

pub const SEARCH_PARAM: &str = "search";
pub const SIMPLE_QUERY_PARAM: &str = "search_simple_query_string";
pub const ORDERING_PARAM: &str = "ordering";

impl SearchRequest {
    /// Pick the search parameters out of decoded query pairs
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let last = |name: &str| {
            pairs
                .iter()
                .rev()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        };
        Self {
            search: last(SEARCH_PARAM),
            simple_query: last(SIMPLE_QUERY_PARAM),
            ordering: last(ORDERING_PARAM),
        }
    }

    fn search(&self) -> Option<&str> {
        non_blank(self.search.as_deref())
    }

    fn simple_query(&self) -> Option<&str> {
        non_blank(self.simple_query.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// One ranked match
#[derive(Debug, Clone, Copy)]
struct RankedHit {
    score: f32,
    position: u64,
    address: DocAddress,
}

/// Ordered matches of one search, fetched lazily page by page
pub struct RankedResults {
    searcher: Searcher,
    source: Field,
    hits: Vec<RankedHit>,
}

/// Document returned from a search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub document: VerseDocument,
    pub score: f32,
}

impl RankedResults {
    pub fn count(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Corpus positions of every match, in result order
    pub fn positions(&self) -> Vec<u64> {
        self.hits.iter().map(|h| h.position).collect()
    }

    /// Read back the documents in `range` (clamped to the result count)
    pub fn fetch(&self, range: Range<usize>) -> Result<Vec<SearchHit>> {
        let end = range.end.min(self.hits.len());
        let start = range.start.min(end);

        self.hits[start..end]
            .iter()
            .map(|hit| {
                let doc: TantivyDocument = self.searcher.doc(hit.address).map_err(|e| {
                    FurqanError::SearchFailed(format!("Failed to retrieve document: {e}"))
                })?;
                let source = doc
                    .get_first(self.source)
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| {
                        FurqanError::SearchFailed("Document has no stored source".to_string())
                    })?;
                Ok(SearchHit {
                    document: serde_json::from_str(source)?,
                    score: hit.score,
                })
            })
            .collect()
    }
}

/// Completion option in a suggest response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestOption {
    pub text: String,
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "_score")]
    pub score: f32,
    #[serde(rename = "_source")]
    pub source: VerseDocument,
}

/// Options for one suggest parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestEntry {
    pub text: String,
    pub offset: usize,
    pub length: usize,
    pub options: Vec<SuggestOption>,
}

/// Suggestions keyed by request parameter
pub type SuggestResponse = BTreeMap<String, Vec<SuggestEntry>>;

/// Builds and runs queries with fixed settings
#[derive(Debug, Clone)]
pub struct QueryPlanner {
    settings: PlannerSettings,
}

impl QueryPlanner {
    pub fn new(settings: PlannerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    fn check_length(&self, param: &str, value: &str) -> Result<()> {
        let len = value.chars().count();
        if len > self.settings.max_query_length {
            return Err(FurqanError::InvalidQuery(format!(
                "{param} is {len} characters long; the limit is {}",
                self.settings.max_query_length
            )));
        }
        Ok(())
    }

    /// Boosted analysed fields searched by both query modes
    fn weighted_fields(&self, generation: &IndexGeneration) -> [(Field, f32); 2] {
        [
            (generation.fields.text, self.settings.text_boost),
            (generation.fields.clean_text, self.settings.clean_text_boost),
        ]
    }

    /// Term query for one token, phrase query for several
    fn match_tokens(field: Field, tokens: &[String]) -> Option<Box<dyn Query>> {
        match tokens {
            [] => None,
            [token] => Some(Box::new(TermQuery::new(
                Term::from_field_text(field, token),
                IndexRecordOption::WithFreqs,
            ))),
            _ => {
                let terms = tokens
                    .iter()
                    .map(|t| Term::from_field_text(field, t))
                    .collect();
                Some(Box::new(PhraseQuery::new(terms)))
            }
        }
    }

    /// Any of the tokens on one field, one should-clause per token
    fn match_any_token(field: Field, tokens: &[String]) -> Option<Box<dyn Query>> {
        if tokens.len() < 2 {
            return Self::match_tokens(field, tokens);
        }
        let clauses = tokens
            .iter()
            .map(|t| {
                let query: Box<dyn Query> = Box::new(TermQuery::new(
                    Term::from_field_text(field, t),
                    IndexRecordOption::WithFreqs,
                ));
                (Occur::Should, query)
            })
            .collect();
        Some(Box::new(BooleanQuery::new(clauses)))
    }

    fn prefix_tokens(field: Field, tokens: &[String]) -> Option<Box<dyn Query>> {
        if tokens.is_empty() {
            return None;
        }
        let terms = tokens
            .iter()
            .map(|t| Term::from_field_text(field, t))
            .collect();
        let mut query = PhrasePrefixQuery::new(terms);
        query.set_max_expansions(PREFIX_EXPANSIONS);
        Some(Box::new(query))
    }

    fn exact(field: Field, value: &str) -> Box<dyn Query> {
        Box::new(TermQuery::new(
            Term::from_field_text(field, value),
            IndexRecordOption::Basic,
        ))
    }

    /// `search=`: boosted text fields plus exact id and number
    ///
    /// Words are matched independently; a verse needs only one of them.
    fn weighted_query(&self, generation: &IndexGeneration, input: &str) -> Result<Box<dyn Query>> {
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();

        for (field, boost) in self.weighted_fields(generation) {
            let mut analyzer = generation.analyzer(field)?;
            let tokens = tokenizer::analyze(&mut analyzer, input);
            if let Some(query) = Self::match_any_token(field, &tokens) {
                clauses.push((Occur::Should, Box::new(BoostQuery::new(query, boost))));
            }
        }
        clauses.push((Occur::Should, Self::exact(generation.fields.id, input)));
        clauses.push((Occur::Should, Self::exact(generation.fields.number, input)));

        Ok(Box::new(BooleanQuery::new(clauses)))
    }

    /// Best of the boosted text fields for one query leaf
    fn leaf(
        &self,
        generation: &IndexGeneration,
        text: &str,
        prefix: bool,
    ) -> Result<Option<Box<dyn Query>>> {
        let mut disjuncts: Vec<Box<dyn Query>> = Vec::new();

        for (field, boost) in self.weighted_fields(generation) {
            let mut analyzer = generation.analyzer(field)?;
            let tokens = tokenizer::analyze(&mut analyzer, text);
            let query = if prefix {
                Self::prefix_tokens(field, &tokens)
            } else {
                Self::match_tokens(field, &tokens)
            };
            if let Some(query) = query {
                disjuncts.push(Box::new(BoostQuery::new(query, boost)));
            }
        }

        Ok(match disjuncts.len() {
            0 => None,
            1 => disjuncts.pop(),
            _ => Some(Box::new(DisjunctionMaxQuery::new(disjuncts))),
        })
    }

    fn negate(query: Box<dyn Query>) -> Box<dyn Query> {
        Box::new(BooleanQuery::new(vec![
            (Occur::Must, Box::new(AllQuery) as Box<dyn Query>),
            (Occur::MustNot, query),
        ]))
    }

    /// Compile a parsed simple query; `None` when nothing is searchable
    fn compile(
        &self,
        generation: &IndexGeneration,
        node: &QueryNode,
    ) -> Result<Option<Box<dyn Query>>> {
        match node {
            QueryNode::Term(text) | QueryNode::Phrase(text) => self.leaf(generation, text, false),
            QueryNode::Prefix(text) => self.leaf(generation, text, true),
            QueryNode::Not(inner) => Ok(self.compile(generation, inner)?.map(Self::negate)),
            QueryNode::And(children) => {
                let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
                for child in children {
                    let (occur, compiled) = match child {
                        QueryNode::Not(inner) => (Occur::MustNot, self.compile(generation, inner)?),
                        other => (Occur::Must, self.compile(generation, other)?),
                    };
                    if let Some(query) = compiled {
                        clauses.push((occur, query));
                    }
                }
                if clauses.is_empty() {
                    return Ok(None);
                }
                // Pure exclusion matches everything else
                if clauses.iter().all(|(occur, _)| *occur == Occur::MustNot) {
                    clauses.push((Occur::Must, Box::new(AllQuery)));
                }
                Ok(Some(Box::new(BooleanQuery::new(clauses))))
            }
            QueryNode::Or(children) => {
                let mut branches = Vec::new();
                for child in children {
                    if let Some(query) = self.compile(generation, child)? {
                        branches.push(query);
                    }
                }
                Ok(match branches.len() {
                    0 => None,
                    1 => branches.pop(),
                    _ => Some(Box::new(BooleanQuery::new(
                        branches.into_iter().map(|q| (Occur::Should, q)).collect(),
                    ))),
                })
            }
        }
    }

    /// `search_simple_query_string=`: boolean phrase query
    fn simple_query(&self, generation: &IndexGeneration, input: &str) -> Result<Box<dyn Query>> {
        let node = parse_simple_query(input, self.settings.default_operator)?;
        self.compile(generation, &node)?.ok_or_else(|| {
            FurqanError::InvalidQuery("Query has no searchable terms".to_string())
        })
    }

    /// Combine the request's query parameters into one query
    pub fn build_query(
        &self,
        generation: &IndexGeneration,
        request: &SearchRequest,
    ) -> Result<Box<dyn Query>> {
        let mut parts: Vec<Box<dyn Query>> = Vec::new();

        if let Some(search) = request.search() {
            self.check_length("search", search)?;
            parts.push(self.weighted_query(generation, search)?);
        }
        if let Some(simple) = request.simple_query() {
            self.check_length("search_simple_query_string", simple)?;
            parts.push(self.simple_query(generation, simple)?);
        }

        Ok(match parts.len() {
            0 => Box::new(AllQuery),
            1 => parts.remove(0),
            _ => Box::new(BooleanQuery::new(
                parts.into_iter().map(|q| (Occur::Must, q)).collect(),
            )),
        })
    }

    /// Run a search and order every match
    pub fn search(
        &self,
        generation: &IndexGeneration,
        request: &SearchRequest,
    ) -> Result<RankedResults> {
        let ordering = parse_ordering(request.ordering.as_deref())?;
        let query = self.build_query(generation, request)?;
        debug!(query = ?query, ordering = ?ordering, "Planned search");

        let searcher = generation.searcher();
        let limit = (searcher.num_docs() as usize).max(1);
        let top_docs = searcher
            .search(&*query, &TopDocs::with_limit(limit))
            .map_err(|e| FurqanError::SearchFailed(format!("Search failed: {e}")))?;

        let columns = searcher
            .segment_readers()
            .iter()
            .map(|reader| reader.fast_fields().u64(POSITION_FIELD))
            .collect::<tantivy::Result<Vec<_>>>()
            .map_err(|e| FurqanError::SearchFailed(format!("Missing position column: {e}")))?;

        let mut hits = top_docs
            .into_iter()
            .map(|(score, address)| {
                let position = columns
                    .get(address.segment_ord as usize)
                    .and_then(|column| column.first(address.doc_id))
                    .ok_or_else(|| {
                        FurqanError::SearchFailed(format!("No position for {address:?}"))
                    })?;
                Ok(RankedHit {
                    score,
                    position,
                    address,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        hits.sort_by(|a, b| compare_hits(a, b, &ordering));

        Ok(RankedResults {
            searcher,
            source: generation.fields.source,
            hits,
        })
    }

    /// Answer `<field>__completion=<prefix>` parameters
    ///
    /// Parameters that are not suggesters are ignored, so an empty
    /// parameter list yields an empty response.
    pub fn suggest(
        &self,
        generation: &IndexGeneration,
        params: &[(String, String)],
    ) -> Result<SuggestResponse> {
        let mut response = SuggestResponse::new();

        for (key, prefix) in params {
            let Some(captures) = SUGGEST_PARAM.captures(key) else {
                continue;
            };
            let (name, suggester) = (&captures[1], &captures[2]);

            if suggester != "completion" {
                return Err(FurqanError::InvalidQuery(format!(
                    "Unsupported suggester '{suggester}' in '{key}'; only 'completion' is available"
                )));
            }
            let field = SuggestField::from_name(name).ok_or_else(|| {
                FurqanError::InvalidQueryField {
                    field: name.to_string(),
                    message: "not a completion field".to_string(),
                    valid_fields: SuggestField::ALL
                        .iter()
                        .map(|f| f.name().to_string())
                        .collect(),
                    suggestion: suggest_completion_alias(name).map(str::to_string),
                }
            })?;
            if prefix.trim().is_empty() {
                return Err(FurqanError::InvalidQuery(format!(
                    "Suggest prefix for '{key}' cannot be empty"
                )));
            }

            let options = generation
                .completions()
                .lookup(field, prefix, self.settings.completion_cap)
                .into_iter()
                .filter_map(|completion| {
                    let source = generation.documents().get(completion.doc)?;
                    Some(SuggestOption {
                        text: completion.text,
                        id: source.id,
                        score: 1.0,
                        source: source.clone(),
                    })
                })
                .collect();

            response.insert(
                key.clone(),
                vec![SuggestEntry {
                    text: prefix.clone(),
                    offset: 0,
                    length: prefix.chars().count(),
                    options,
                }],
            );
        }

        Ok(response)
    }
}

fn compare_hits(a: &RankedHit, b: &RankedHit, ordering: &[OrderKey]) -> CmpOrdering {
    let (a_chapter, a_number) = super::projector::split_position(a.position);
    let (b_chapter, b_number) = super::projector::split_position(b.position);

    for key in ordering {
        let ord = match key.field {
            OrderField::Chapter => a_chapter.cmp(&b_chapter),
            OrderField::Number => a_number.cmp(&b_number),
            OrderField::Score => a.score.total_cmp(&b.score),
        };
        let ord = if key.descending { ord.reverse() } else { ord };
        if ord != CmpOrdering::Equal {
            return ord;
        }
    }
    a.position.cmp(&b.position)
}
