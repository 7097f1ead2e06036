//! Shared fixtures for unit tests: a string-rendering backend, a sample
//! model and a recording handler.

use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use crate::context::FilterContext;
use crate::error::SpecResult;
use crate::filters::StringMatch;
use crate::fragment::{Backend, Comparison, FieldTarget, Fragment, NullCheck};
use crate::handlers::{FilterHandler, Next};
use crate::schema::Model;
use crate::value::FieldValue;

/// A fragment that renders as a readable boolean expression.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    True,
    False,
    Leaf(String),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

impl Fragment for Expr {
    fn empty() -> Self {
        Expr::True
    }

    fn never() -> Self {
        Expr::False
    }

    fn is_empty(&self) -> bool {
        matches!(self, Expr::True)
    }

    fn and(self, other: Self) -> Self {
        match (self, other) {
            (Expr::True, x) | (x, Expr::True) => x,
            (a, b) => Expr::And(Box::new(a), Box::new(b)),
        }
    }

    fn or(self, other: Self) -> Self {
        match (self, other) {
            (Expr::True, _) | (_, Expr::True) => Expr::True,
            (a, b) => Expr::Or(Box::new(a), Box::new(b)),
        }
    }

    fn not(self) -> Self {
        match self {
            Expr::True => Expr::False,
            Expr::False => Expr::True,
            x => Expr::Not(Box::new(x)),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::True => f.write_str("true"),
            Expr::False => f.write_str("false"),
            Expr::Leaf(s) => f.write_str(s),
            Expr::And(a, b) => write!(f, "({} && {})", a, b),
            Expr::Or(a, b) => write!(f, "({} || {})", a, b),
            Expr::Not(x) => write!(f, "!({})", x),
        }
    }
}

/// Renders every primitive as text.
pub(crate) struct TextBackend<M> {
    _model: PhantomData<fn() -> M>,
}

impl<M> Default for TextBackend<M> {
    fn default() -> Self {
        Self { _model: PhantomData }
    }
}

impl<M> fmt::Debug for TextBackend<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TextBackend")
    }
}

impl<M: Model> Backend for TextBackend<M> {
    type Model = M;
    type Fragment = Expr;

    fn name(&self) -> &'static str {
        "text"
    }

    fn equals(&self, target: FieldTarget<'_, M>, value: &FieldValue) -> SpecResult<Expr> {
        Ok(Expr::Leaf(format!("{} == {}", target.path(), value)))
    }

    fn one_of(&self, target: FieldTarget<'_, M>, values: &[FieldValue]) -> SpecResult<Expr> {
        if values.is_empty() {
            return Ok(Expr::never());
        }
        let values = values.iter().map(ToString::to_string).collect::<Vec<_>>();
        Ok(Expr::Leaf(format!("{} in [{}]", target.path(), values.join(", "))))
    }

    fn null_check(&self, target: FieldTarget<'_, M>, check: NullCheck) -> SpecResult<Expr> {
        let op = match check {
            NullCheck::IsNull => "is null",
            NullCheck::IsNotNull => "is not null",
        };
        Ok(Expr::Leaf(format!("{} {}", target.path(), op)))
    }

    fn compare(&self, target: FieldTarget<'_, M>, op: Comparison, value: &FieldValue) -> SpecResult<Expr> {
        Ok(Expr::Leaf(format!("{} {} {}", target.path(), op, value)))
    }

    fn text(&self, target: FieldTarget<'_, M>, mode: StringMatch, value: &str) -> SpecResult<Expr> {
        let leaf = match mode {
            StringMatch::Exact => format!("{} == {:?}", target.path(), value),
            mode => format!("{} {} {:?}", target.path(), mode.as_str(), value),
        };
        Ok(Expr::Leaf(leaf))
    }
}

pub(crate) struct Person {
    pub id: i32,
    pub list_id: i32,
    pub name: String,
    pub nickname: Option<String>,
    pub age: i32,
}

crate::model_schema!(Person {
    id,
    list_id,
    name,
    nickname,
    age
});

/// Records `recorder-N:<field>` and passes control on.
pub(crate) struct Recorder<const ID: u8> {
    log: Arc<Mutex<Vec<String>>>,
}

impl<const ID: u8> Recorder<ID> {
    pub fn new(log: Arc<Mutex<Vec<String>>>) -> Self {
        Self { log }
    }
}

impl<B: Backend, const ID: u8> FilterHandler<B> for Recorder<ID> {
    fn name(&self) -> &'static str {
        match ID {
            1 => "recorder-1",
            2 => "recorder-2",
            _ => "recorder",
        }
    }

    fn can_handle(&self, _ctx: &FilterContext<'_, B>) -> bool {
        true
    }

    fn handle(&self, ctx: &mut FilterContext<'_, B>, next: Next<'_, B>) -> SpecResult<()> {
        if let Ok(mut log) = self.log.lock() {
            log.push(format!("recorder-{}:{}", ID, ctx.filter_field()));
        }
        next.run(ctx)
    }
}
