use super::*;

// --- Token model ---

#[test]
fn test_token_kind_bands() {
    for kind in TokenKind::ALL {
        let bands = [kind.is_operator(), kind.is_identifier(), kind.is_keyword()];
        assert_eq!(bands.iter().filter(|b| **b).count(), 1, "{kind}");
    }

    assert!(TokenKind::Wildcard.is_operator());
    assert!(TokenKind::Ignored.is_identifier());
    assert!(TokenKind::Emoji.is_identifier());
    assert!(TokenKind::To.is_keyword());
}

#[test]
fn test_token_kind_codes_and_names() {
    assert_eq!(TokenKind::Word.code(), 101);
    assert_eq!(TokenKind::from_code(202), Some(TokenKind::To));
    assert_eq!(TokenKind::from_code(16), None);
    assert_eq!(TokenKind::type_name(104), Some("T_PHRASE"));
    assert_eq!(TokenKind::type_name(999), None);

    for kind in TokenKind::ALL {
        assert_eq!(TokenKind::from_code(kind.code()), Some(kind));
    }
}

#[test]
fn test_token_display_and_json() {
    assert_eq!(Token::text(TokenKind::Word, "cat").to_string(), "T_WORD(cat)");
    assert_eq!(Token::number(1.5).to_string(), "T_NUMBER(1.5)");
    assert_eq!(Token::new(TokenKind::FilterEnd).to_string(), "T_FILTER_END");

    let json = serde_json::to_value(Token::text(TokenKind::Word, "cat")).unwrap();
    assert_eq!(json, serde_json::json!({"type": "T_WORD", "value": "cat"}));
    let json = serde_json::to_value(Token::new(TokenKind::Boost)).unwrap();
    assert_eq!(json, serde_json::json!({"type": "T_BOOST"}));
}

// --- Cursor ---

fn stream_of(kinds: &[TokenKind]) -> TokenStream {
    TokenStream::new(kinds.iter().map(|k| Token::new(*k)).collect())
}

#[test]
fn test_stream_move_next() {
    let mut stream = stream_of(&[TokenKind::Required, TokenKind::Boost]);
    assert!(stream.current().is_none());
    assert!(stream.lookahead().is_none());

    assert!(stream.move_next());
    assert!(stream.current().is_none());
    assert!(stream.is_next_token(TokenKind::Required));

    assert!(stream.move_next());
    assert!(stream.current().unwrap().is(TokenKind::Required));
    assert!(stream.is_next_token_any(&[TokenKind::Fuzzy, TokenKind::Boost]));

    assert!(!stream.move_next());
    assert!(stream.current().unwrap().is(TokenKind::Boost));
    assert!(stream.lookahead().is_none());
}

#[test]
fn test_stream_peek_and_glimpse() {
    let mut stream = stream_of(&[
        TokenKind::Word,
        TokenKind::Boost,
        TokenKind::Number,
        TokenKind::Fuzzy,
    ]);
    stream.move_next();

    assert_eq!(stream.peek().map(|t| t.kind), Some(TokenKind::Boost));
    assert_eq!(stream.peek().map(|t| t.kind), Some(TokenKind::Number));
    assert_eq!(stream.peek().map(|t| t.kind), Some(TokenKind::Fuzzy));
    assert!(stream.peek().is_none());

    stream.reset_peek();
    assert_eq!(stream.glimpse().map(|t| t.kind), Some(TokenKind::Boost));
    assert_eq!(stream.glimpse().map(|t| t.kind), Some(TokenKind::Boost));

    // peeking never moves the cursor
    assert!(stream.is_next_token(TokenKind::Word));
}

#[test]
fn test_stream_skip_until() {
    let mut stream = stream_of(&[
        TokenKind::Word,
        TokenKind::Number,
        TokenKind::FilterEnd,
        TokenKind::Word,
    ]);
    stream.move_next();
    stream.skip_until(TokenKind::FilterEnd);
    assert!(stream.is_next_token(TokenKind::FilterEnd));

    stream.skip_until(TokenKind::To);
    assert!(stream.lookahead().is_none());

    stream.reset();
    stream.move_next();
    assert!(stream.is_next_token(TokenKind::Word));
}

// --- Lexer details ---

#[test]
fn test_scan_number_values() {
    for (input, expected) in [("100", 100.0), ("-2.2E-5", -2.2E-5), (".64", 0.64), ("6.022e23", 6.022e23)] {
        let tokens = scan(input).into_tokens();
        assert_eq!(tokens, vec![Token::number(expected)], "{input}");
    }
}

#[test]
fn test_scan_comparison_outside_filter_is_dropped() {
    let tokens = scan("> 5 <= x").into_tokens();
    assert_eq!(
        tokens,
        vec![Token::number(5.0), Token::text(TokenKind::Word, "x")]
    );
}

#[test]
fn test_scan_unterminated_subquery_is_closed() {
    let kinds: Vec<_> = scan("(a b").tokens().iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::SubqueryStart,
            TokenKind::Word,
            TokenKind::Word,
            TokenKind::SubqueryEnd
        ]
    );
}

#[test]
fn test_scan_zero_is_ignored_as_word() {
    // a bare "0" is a number, but a quoted one trims down to an empty word
    assert_eq!(scan("0").into_tokens(), vec![Token::number(0.0)]);
    assert!(scan("'0'").is_empty());
}

#[test]
fn test_scan_overflowing_number_is_a_word() {
    assert_eq!(
        scan("1e999").into_tokens(),
        vec![Token::text(TokenKind::Word, "1e999")]
    );

    let query = QueryParser::new().parse("1e999^2");
    let json = serde_json::to_value(&query).unwrap();
    let back: Vec<Node> = serde_json::from_value(json).unwrap();
    assert_eq!(back, query.into_nodes());
}

// --- Nodes ---

#[test]
fn test_node_type_tags() {
    assert_eq!(NodeType::WordRange.as_str(), "WORD_RANGE");
    assert_eq!(NodeType::Subquery.to_string(), "SUBQUERY");
    assert!(NodeType::Filter.is_compound());
    assert!(!NodeType::Emoticon.is_compound());
}

#[test]
fn test_range_requires_a_bound() {
    assert!(Range::<f64>::new(None, None, false).is_none());

    let range = Range::new(Some(1.0), None, true).unwrap();
    assert_eq!(range.lower_bound(), Some(&1.0));
    assert_eq!(range.upper_bound(), None);
    assert!(range.is_exclusive());
    assert_eq!(range.to_string(), "{1 TO *}");
}

#[test]
fn test_node_dates() {
    assert_eq!(
        Node::date("2015-12-18").to_naive_date(),
        chrono::NaiveDate::from_ymd_opt(2015, 12, 18)
    );
    assert_eq!(Node::date("2015-13-45").to_naive_date(), None);
    assert_eq!(Node::word("2015-12-18").to_naive_date(), None);
}

#[test]
fn test_node_json_shape() {
    let node = Node::filter("price", Some(ComparisonOperator::Gte), Node::number(10.0))
        .with_bool_operator(BoolOperator::Required)
        .with_boost(2.0);

    let json = serde_json::to_value(&node).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "type": "FILTER",
            "field": "price",
            "comparison": "gte",
            "value": {"type": "NUMBER", "value": 10.0},
            "bool_operator": "required",
            "boost": 2.0,
        })
    );

    let back: Node = serde_json::from_value(json).unwrap();
    assert_eq!(back, node);
}

#[test]
fn test_node_json_range_and_wildcard() {
    let query = QueryParser::new().parse("f:[a TO *] cat*");
    let json = serde_json::to_value(&query).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {
                "type": "FILTER",
                "field": "f",
                "value": {"type": "WORD_RANGE", "lower": "a", "exclusive": false},
            },
            {"type": "WORD", "value": "cat", "trailing_wildcard": true},
        ])
    );
}

// --- Visitor ---

#[derive(Default)]
struct Collector {
    events: Vec<String>,
}

impl QueryVisitor for Collector {
    fn visit_leaf(&mut self, node: &Node) {
        self.events.push(format!("leaf {node}"));
    }

    fn visit_range(&mut self, node: &Node) {
        self.events.push(format!("range {node}"));
    }

    fn enter_filter(&mut self, _node: &Node, filter: &Filter) {
        self.events.push(format!("enter {}", filter.field()));
    }

    fn leave_filter(&mut self, _node: &Node, filter: &Filter) {
        self.events.push(format!("leave {}", filter.field()));
    }

    fn enter_subquery(&mut self, node: &Node) {
        self.events.push(format!("( {}", node.children().len()));
    }

    fn leave_subquery(&mut self, _node: &Node) {
        self.events.push(")".to_string());
    }
}

#[test]
fn test_visitor_walks_in_order() {
    let query = QueryParser::new().parse("-a tags:(#x y) n:[1 TO 2]");
    let mut collector = Collector::default();
    query.accept(&mut collector);

    assert_eq!(
        collector.events,
        vec![
            "leaf -a",
            "enter tags",
            "( 2",
            "leaf #x",
            "leaf y",
            ")",
            "leave tags",
            "enter n",
            "range [1 TO 2]",
            "leave n",
        ]
    );
}

#[test]
fn test_parsed_query_helpers() {
    let query = QueryParser::new().parse("-a -b");
    assert_eq!(query.len(), 2);
    assert!(!query.has_matchable_node());

    let query = QueryParser::new().parse("-a b #c #d");
    assert!(query.has_matchable_node());
    assert_eq!(query.nodes_of_type(NodeType::Hashtag).count(), 2);
    assert_eq!(query.clone().into_nodes().len(), 4);
    assert_eq!(query.into_iter().count(), 4);
}

#[test]
fn test_parse_token_stream_directly() {
    // a hand-built stream, including a range start outside any filter
    let stream = TokenStream::new(vec![
        Token::new(TokenKind::Prohibited),
        Token::new(TokenKind::RangeExclStart),
        Token::number(1.0),
        Token::new(TokenKind::To),
        Token::number(9.0),
        Token::new(TokenKind::RangeExclEnd),
        Token::new(TokenKind::SubqueryEnd),
    ]);

    let nodes = parse(stream);
    assert_eq!(nodes.len(), 1);
    assert!(nodes[0].is_prohibited());
    assert_eq!(nodes[0].to_string(), "-{1 TO 9}");
}
