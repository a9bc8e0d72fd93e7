//! Just enough CSS selector support for the headless document: type, class, id and attribute
//! selectors, compounds of those, and comma separated lists. Combinators are not supported, and
//! a selector using them never matches.

/// Read access to an element, for matching against.
pub trait Subject {
    fn tag(&self) -> &str;
    fn has_class(&self, class: &str) -> bool;
    fn attribute(&self, name: &str) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    op: AttrOp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttrMatch>,
}

impl Compound {
    fn matches(&self, subject: &dyn Subject) -> bool {
        self.tag
            .as_deref()
            .map_or(true, |tag| subject.tag().eq_ignore_ascii_case(tag))
            && self
                .id
                .as_deref()
                .map_or(true, |id| subject.attribute("id") == Some(id))
            && self.classes.iter().all(|class| subject.has_class(class))
            && self.attributes.iter().all(|attr| {
                let value = subject.attribute(&attr.name);
                match &attr.op {
                    AttrOp::Exists => value.is_some(),
                    AttrOp::Equals(expected) => value == Some(expected.as_str()),
                    AttrOp::Prefix(prefix) => {
                        value.is_some_and(|value| value.starts_with(prefix.as_str()))
                    }
                }
            })
    }
}

/// A parsed, comma separated list of compound selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(Vec<Compound>);

impl SelectorList {
    /// Parse `selector`, returning [`None`] for anything outside the supported subset.
    pub fn parse(selector: &str) -> Option<Self> {
        selector
            .split(',')
            .map(|part| parse_compound(part.trim()))
            .collect::<Option<Vec<_>>>()
            .map(Self)
    }

    pub fn matches(&self, subject: &dyn Subject) -> bool {
        self.0.iter().any(|compound| compound.matches(subject))
    }
}

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }

    (!ident.is_empty()).then_some(ident)
}

fn parse_compound(source: &str) -> Option<Compound> {
    if source.is_empty() {
        return None;
    }

    let mut compound = Compound::default();
    let mut chars = source.chars().peekable();

    if chars.peek().is_some_and(|&c| is_ident(c)) {
        compound.tag = take_ident(&mut chars);
    } else if chars.peek() == Some(&'*') {
        chars.next();
    }

    while let Some(c) = chars.next() {
        match c {
            '.' => compound.classes.push(take_ident(&mut chars)?),
            '#' => compound.id = Some(take_ident(&mut chars)?),
            '[' => compound.attributes.push(parse_attribute(&mut chars)?),
            _ => return None,
        }
    }

    Some(compound)
}

fn parse_attribute(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<AttrMatch> {
    let name = take_ident(chars)?;

    let op = match chars.next()? {
        ']' => return Some(AttrMatch { name, op: AttrOp::Exists }),
        '=' => AttrOp::Equals(String::new()),
        '^' if chars.next()? == '=' => AttrOp::Prefix(String::new()),
        _ => return None,
    };

    let value = match chars.peek().copied()? {
        quote @ ('"' | '\'') => {
            chars.next();
            let mut value = String::new();
            loop {
                match chars.next()? {
                    c if c == quote => break,
                    c => value.push(c),
                }
            }
            value
        }
        _ => take_ident(chars)?,
    };

    if chars.next()? != ']' {
        return None;
    }

    Some(AttrMatch {
        name,
        op: match op {
            AttrOp::Prefix(_) => AttrOp::Prefix(value),
            _ => AttrOp::Equals(value),
        },
    })
}
