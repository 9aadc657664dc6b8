//! Grammars shared by the chart tests.

use std::collections::HashSet;
use std::sync::Arc;

use featchart_chart::{ChartParser, ParseTree, ParserConfig, Strategy, Token};
use featchart_grammar::{Grammar, parse_grammar};

/// Subject-verb agreement; objects do not agree.
pub const AGREEMENT: &str = "
S -> NP[num=?n] VP[num=?n]
VP[num=?n] -> V[num=?n] NP
NP[num=sg] -> 'Kim'
NP[num=pl] -> 'children'
V[num=sg] -> 'sees'
V[num=pl] -> 'see'
";

/// A plural-only subject against a singular-only verb.
pub const DISAGREEMENT: &str = "
S -> NP[num=?n] VP[num=?n]
NP[num=pl] -> 'Kim'
VP[num=sg] -> 'sees'
";

/// Number fixed by the verb phrase and left open below the noun phrase.
pub const LATE_BINDING: &str = "
S -> NP[num=?n] VP[num=?n]
NP[num=?n] -> PN[num=?n]
PN -> 'Kim'
VP[num=sg] -> 'sleeps'
";

/// A determiner that takes its number from the noun.
pub const OPEN_DETERMINER: &str = "
S -> NP[num=?n] VP[num=?n]
NP[num=?n] -> Det[num=?n] N[num=?n]
Det[num=?n] -> 'the'
N[num=pl] -> 'dogs'
N[num=sg] -> 'dog'
VP[num=pl] -> 'bark'
";

/// Two noun phrases over `fish`, one more specific than the other.
pub const NESTED_READINGS: &str = "
S -> NP[num=?n] VP[num=?n]
NP[num=?n] -> N[num=?n]
NP -> 'fish'
N[num=sg] -> 'fish'
VP -> 'swim'
";

/// Prepositional phrases attach to the verb or to the noun phrase.
pub const ATTACHMENT: &str = "
% start VP
VP -> V NP | V NP PP
NP -> Det N | NP PP
PP -> P NP
V -> 'saw'
Det -> 'the'
N -> 'man' | 'telescope' | 'park'
P -> 'with' | 'in'
";

/// An optional determiner.
pub const OPTIONAL: &str = "
S -> NP VP
NP -> Det N
Det -> 'the' |
N -> 'dogs'
VP -> 'bark'
";

/// A unary cycle through `A` and `B`.
pub const UNARY_CYCLE: &str = "
S -> A
A -> B | 'x'
B -> A
";

pub const STRATEGIES: [Strategy; 3] = [Strategy::TopDown, Strategy::BottomUp, Strategy::LeftCorner];

pub fn grammar(source: &str) -> Arc<Grammar> {
    Arc::new(parse_grammar(source).unwrap())
}

pub fn parser(source: &str, strategy: Strategy) -> ChartParser {
    ChartParser::with_config(grammar(source), ParserConfig::default().with_strategy(strategy))
}

pub fn trees(source: &str, strategy: Strategy, sentence: &str) -> HashSet<ParseTree> {
    parser(source, strategy)
        .parse_trees(&Token::words(sentence))
        .unwrap()
        .into_iter()
        .collect()
}

pub fn bracketed(trees: &HashSet<ParseTree>) -> Vec<String> {
    let mut out: Vec<String> = trees.iter().map(ToString::to_string).collect();
    out.sort();
    out
}
