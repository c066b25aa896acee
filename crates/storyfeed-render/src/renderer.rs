use crate::document::DocumentTree;
use crate::sanitizer::{SafeHtml, Sanitizer};
use crate::serializer::serialize;

/// Serializer and sanitizer bundled behind one call.
///
/// Construct one per process and share it by reference; rendering takes
/// `&self` and keeps no state between calls.
#[derive(Debug, Default)]
pub struct Renderer {
    sanitizer: Sanitizer,
}

impl Renderer {
    pub fn new(sanitizer: Sanitizer) -> Self {
        Self { sanitizer }
    }

    /// A renderer over the headless DOM.
    pub fn headless() -> Self {
        Self::new(Sanitizer::headless())
    }

    pub fn sanitizer(&self) -> &Sanitizer {
        &self.sanitizer
    }

    /// Serialize and sanitize a decoded tree.
    pub fn render(&self, document: &DocumentTree) -> SafeHtml {
        self.sanitizer.sanitize(&serialize(document))
    }

    /// Decode, serialize, and sanitize a stored body.
    ///
    /// A body that does not decode renders as empty HTML; the failure is
    /// logged and the caller carries on with the rest of the page.
    pub fn render_encoded(&self, encoded: &str) -> SafeHtml {
        if encoded.trim().is_empty() {
            return SafeHtml::empty();
        }
        match DocumentTree::from_json(encoded) {
            Ok(document) => self.render(&document),
            Err(e) => {
                tracing::warn!(error = %e, "story content failed to decode, rendering empty");
                SafeHtml::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{BlockKind, MarkKind, Node};
    use proptest::prelude::*;

    #[test]
    fn heading_paragraph_link_scenario() {
        let tree = DocumentTree::new(vec![
            Node::block(BlockKind::HeadingOne, vec![Node::text("Hi")]),
            Node::block(
                BlockKind::Paragraph,
                vec![Node::text("Bye"), Node::link("http://x", vec![])],
            ),
        ]);
        let raw = serialize(&tree);
        assert_eq!(raw, "<h1>Hi</h1><p>Bye<a href=\"http://x\"></a></p>");
        assert_eq!(Renderer::headless().render(&tree).as_str(), raw);
    }

    #[test]
    fn malicious_link_is_neutralised() {
        let tree = DocumentTree::new(vec![Node::block(
            BlockKind::Paragraph,
            vec![Node::link("javascript:alert(1)", vec![Node::text("click")])],
        )]);
        assert_eq!(Renderer::headless().render(&tree).as_str(), "<p><a>click</a></p>");
    }

    #[test]
    fn encoded_body_renders() {
        let tree = DocumentTree::new(vec![Node::block(
            BlockKind::Paragraph,
            vec![Node::marked("bold", vec![MarkKind::Bold])],
        )]);
        let html = Renderer::headless().render_encoded(&tree.to_json());
        assert_eq!(html.as_str(), "<p><strong>bold</strong></p>");
    }

    #[test]
    fn undecodable_body_renders_empty() {
        let renderer = Renderer::headless();
        assert!(renderer.render_encoded("{not json").is_empty());
        assert!(renderer.render_encoded("{\"unexpected\":true}").is_empty());
        assert!(renderer.render_encoded("").is_empty());
    }

    #[test]
    fn renderer_is_shareable_across_threads() {
        use std::sync::Arc;

        let renderer = Arc::new(Renderer::headless());
        let tree = DocumentTree::new(vec![Node::block(BlockKind::HeadingTwo, vec![Node::text("t")])]);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let renderer = Arc::clone(&renderer);
                let tree = tree.clone();
                std::thread::spawn(move || renderer.render(&tree))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap().as_str(), "<h2>t</h2>");
        }
    }

    fn arb_mark() -> impl Strategy<Value = MarkKind> {
        prop_oneof![
            Just(MarkKind::Bold),
            Just(MarkKind::Italic),
            Just(MarkKind::Underlined),
        ]
    }

    fn arb_block_kind() -> impl Strategy<Value = BlockKind> {
        prop_oneof![
            Just(BlockKind::Paragraph),
            Just(BlockKind::BlockQuote),
            Just(BlockKind::ListItem),
            Just(BlockKind::NumberedList),
            Just(BlockKind::BulletedList),
            Just(BlockKind::HeadingOne),
            Just(BlockKind::HeadingTwo),
            Just(BlockKind::HeadingThree),
        ]
    }

    fn arb_node() -> impl Strategy<Value = Node> {
        let leaf = prop_oneof![
            ("[a-zA-Z0-9 <>&\"']{0,12}", prop::collection::vec(arb_mark(), 0..3))
                .prop_map(|(text, marks)| Node::marked(text, marks)),
            "https://[a-z]{1,8}\\.io/[a-z]{0,6}".prop_map(Node::image),
        ];
        leaf.prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                (arb_block_kind(), prop::collection::vec(inner.clone(), 0..4))
                    .prop_map(|(kind, nodes)| Node::block(kind, nodes)),
                ("https?://[a-z]{1,8}", prop::collection::vec(inner, 0..3))
                    .prop_map(|(href, nodes)| Node::link(href, nodes)),
            ]
        })
    }

    proptest! {
        #[test]
        fn render_is_deterministic(nodes in prop::collection::vec(arb_node(), 0..6)) {
            let a = DocumentTree::new(nodes.clone());
            let b = DocumentTree::new(nodes);
            let first = Renderer::headless().render(&a);
            let second = Renderer::headless().render(&b);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(Renderer::headless().render(&a), first);
        }

        #[test]
        fn injected_markup_never_survives(payload in "[a-z]{0,8}") {
            let tree = DocumentTree::new(vec![Node::block(
                BlockKind::Paragraph,
                vec![Node::text(format!("<script>{payload}</script><b onclick=x>"))],
            )]);
            let html = Renderer::headless().render(&tree);
            prop_assert!(!html.as_str().contains("<script"));
            prop_assert!(!html.as_str().contains("<b "));
        }
    }
}
