use std::{collections::HashSet, fmt::Write};

use super::{escape, path};
use crate::model::Topic;

/// 树中节点的索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
pub struct TreeNode {
    pub topic_id: i64,
    pub title: String,
    pub slug: String,
    /// 嵌套深度，根节点为 0
    pub depth: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl TreeNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// 缩进像素
    pub fn indent(&self) -> usize {
        self.depth * 16 + 12
    }
}

/// 主题树
///
/// 由后端返回的嵌套主题构建，节点按索引存放，父子关系只保存索引。
/// 子节点顺序与后端返回的顺序一致（后端已按 `displayOrder` 排序），这里不做排序。
#[derive(Debug, Default)]
pub struct TopicTree {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
}

impl TopicTree {
    pub fn from_topics(topics: &[Topic]) -> Self {
        let mut tree = Self::default();

        // 显式栈，避免嵌套过深时递归
        let mut stack: Vec<(&Topic, Option<NodeId>, usize)> =
            topics.iter().rev().map(|t| (t, None, 0)).collect();

        while let Some((topic, parent, depth)) = stack.pop() {
            let id = NodeId(tree.nodes.len());
            tree.nodes.push(TreeNode {
                topic_id: topic.id,
                title: topic.title.clone(),
                slug: topic.slug.clone(),
                depth,
                parent,
                children: Vec::new(),
            });

            match parent {
                Some(parent) => tree.nodes[parent.0].children.push(id),
                None => tree.roots.push(id),
            }

            if topic.has_children() {
                stack.extend(
                    topic
                        .children
                        .iter()
                        .rev()
                        .map(|child| (child, Some(id), depth + 1)),
                );
            }
        }

        tree
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.slug == slug).map(NodeId)
    }

    /// 前序遍历可见节点，`is_expanded` 为 false 的节点不会展开子节点
    pub fn visible(&self, is_expanded: impl Fn(&TreeNode) -> bool) -> Vec<NodeId> {
        let mut visited = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            visited.push(id);
            let node = self.node(id);
            if is_expanded(node) {
                stack.extend(node.children.iter().rev().copied());
            }
        }

        visited
    }
}

/// 侧边栏导航
///
/// 每个节点的展开状态只属于侧边栏自身，不放入全局状态。默认全部展开，
/// 这里只记录被折叠的主题 id，主题树重新加载后状态依然保留。
#[derive(Debug, Default)]
pub struct Sidebar {
    collapsed: HashSet<i64>,
}

impl Sidebar {
    pub fn is_expanded(&self, node: &TreeNode) -> bool {
        !self.collapsed.contains(&node.topic_id)
    }

    /// 点击节点标题
    ///
    /// 有子节点时切换展开状态，返回需要跳转的主题详情路径。
    pub fn click(&mut self, tree: &TopicTree, id: NodeId) -> String {
        let node = tree.node(id);
        if node.has_children() && !self.collapsed.remove(&node.topic_id) {
            self.collapsed.insert(node.topic_id);
        }
        path("/topic", &node.slug)
    }

    /// 渲染整棵树，`active` 为当前打开的主题 slug
    pub fn render(&self, tree: &TopicTree, active: Option<&str>) -> String {
        let mut html = String::from(r#"<nav class="topic-tree">"#);
        for &root in tree.roots() {
            self.render_node(tree, root, active, &mut html);
        }
        html.push_str("</nav>");
        html
    }

    fn render_node(&self, tree: &TopicTree, id: NodeId, active: Option<&str>, html: &mut String) {
        let node = tree.node(id);
        let expanded = self.is_expanded(node);

        let class = if active == Some(node.slug.as_str()) {
            "sidebar-item active"
        } else {
            "sidebar-item"
        };
        let chevron = match (node.has_children(), expanded) {
            (false, _) => r#"<span class="chevron-placeholder"></span>"#,
            (true, true) => r#"<span class="chevron down">&#9662;</span>"#,
            (true, false) => r#"<span class="chevron right">&#9656;</span>"#,
        };

        let _ = write!(
            html,
            r#"<div class="tree-node"><a class="{class}" href="{}" style="padding-left: {}px" data-depth="{}">{chevron}<span class="title">{}</span></a>"#,
            path("/nav", &node.slug),
            node.indent(),
            node.depth,
            escape(&node.title),
        );

        if node.has_children() && expanded {
            html.push_str(r#"<div class="tree-children">"#);
            for &child in &node.children {
                self.render_node(tree, child, active, html);
            }
            html.push_str("</div>");
        }

        html.push_str("</div>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(id: i64, slug: &str, children: Vec<Topic>) -> Topic {
        Topic {
            id,
            title: format!("Title {slug}"),
            slug: slug.to_string(),
            content: String::new(),
            parent_id: None,
            display_order: 0,
            children,
            tags: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// dsa
    /// ├── arrays
    /// │   └── two-pointers
    /// └── graphs
    /// oop
    fn sample() -> Vec<Topic> {
        vec![
            topic(
                1,
                "dsa",
                vec![
                    topic(2, "arrays", vec![topic(3, "two-pointers", vec![])]),
                    topic(4, "graphs", vec![]),
                ],
            ),
            topic(5, "oop", vec![]),
        ]
    }

    fn slugs(tree: &TopicTree, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|&id| tree.node(id).slug.clone()).collect()
    }

    #[test]
    fn test_visits_every_node_once_in_order() {
        let tree = TopicTree::from_topics(&sample());

        let visited = tree.visible(|_| true);

        assert_eq!(tree.len(), 5);
        assert_eq!(
            slugs(&tree, &visited),
            vec!["dsa", "arrays", "two-pointers", "graphs", "oop"]
        );
    }

    #[test]
    fn test_indent_increases_with_depth() {
        let tree = TopicTree::from_topics(&sample());

        for id in tree.visible(|_| true) {
            let node = tree.node(id);
            if let Some(parent) = node.parent {
                let parent = tree.node(parent);
                assert_eq!(node.depth, parent.depth + 1);
                assert!(node.indent() > parent.indent());
            } else {
                assert_eq!(node.indent(), 12);
            }
        }
    }

    #[test]
    fn test_rendered_indent_matches_depth() {
        let tree = TopicTree::from_topics(&sample());
        let html = Sidebar::default().render(&tree, None);

        assert_eq!(html.matches("sidebar-item").count(), 5);
        assert!(html.contains(r#"href="/nav/two-pointers" style="padding-left: 44px""#));
        assert!(html.contains(r#"href="/nav/oop" style="padding-left: 12px""#));
    }

    #[test]
    fn test_chevron_only_for_parents() {
        let tree = TopicTree::from_topics(&sample());
        let html = Sidebar::default().render(&tree, Some("graphs"));

        // dsa 和 arrays 有子节点
        assert_eq!(html.matches(r#"class="chevron down""#).count(), 2);
        assert_eq!(html.matches("chevron-placeholder").count(), 3);
        assert!(html.contains(r#"<a class="sidebar-item active" href="/nav/graphs""#));
    }

    #[test]
    fn test_click_toggles_only_parents() {
        let tree = TopicTree::from_topics(&sample());
        let mut sidebar = Sidebar::default();

        let dsa = tree.find_by_slug("dsa").unwrap();
        assert_eq!(sidebar.click(&tree, dsa), "/topic/dsa");
        assert!(!sidebar.is_expanded(tree.node(dsa)));

        let visible = tree.visible(|n| sidebar.is_expanded(n));
        assert_eq!(slugs(&tree, &visible), vec!["dsa", "oop"]);

        let html = sidebar.render(&tree, None);
        assert!(!html.contains("/nav/arrays"));
        assert!(html.contains(r#"class="chevron right""#));

        let oop = tree.find_by_slug("oop").unwrap();
        assert_eq!(sidebar.click(&tree, oop), "/topic/oop");
        assert!(sidebar.is_expanded(tree.node(oop)));

        sidebar.click(&tree, dsa);
        assert_eq!(tree.visible(|n| sidebar.is_expanded(n)).len(), 5);
    }

    #[test]
    fn test_empty_tree() {
        let tree = TopicTree::from_topics(&[]);

        assert!(tree.is_empty());
        assert_eq!(Sidebar::default().render(&tree, None), r#"<nav class="topic-tree"></nav>"#);
    }
}
