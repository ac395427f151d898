//! Name lookup capability and expression resolution over it

use std::collections::{HashMap, HashSet};

use crate::error::{DomainError, DomainResult};
use crate::expression::Expression;

use super::holder::{DataHolder, HolderValue};

/// Finds holders by name. This is all expression evaluation needs from a
/// data source, so any in-memory collection can stand in for one.
pub trait HolderLookup {
    /// Returns the holder with the given name, if any.
    fn lookup(&self, name: &str) -> Option<&DataHolder>;
}

/// First match wins.
impl HolderLookup for [DataHolder] {
    fn lookup(&self, name: &str) -> Option<&DataHolder> {
        self.iter().find(|holder| holder.name() == name)
    }
}

/// An expression holder whose references are being settled.
struct Frame<'a> {
    holder: &'a DataHolder,
    expression: Expression,
    references: Vec<String>,
    next: usize,
}

impl<'a> Frame<'a> {
    fn open(holder: &'a DataHolder, expression: &str) -> DomainResult<Self> {
        let expression = Expression::parse(expression)?;
        let references = expression
            .references()
            .into_iter()
            .map(str::to_string)
            .collect();
        Ok(Self {
            holder,
            expression,
            references,
            next: 0,
        })
    }
}

/// One evaluation of a holder and its unresolved dependencies.
///
/// Dependencies are settled with an explicit stack, so chain length is not
/// bounded by the call stack. Each expression is parsed and computed at most
/// once per pass; computed values live in the pass, never in the siblings.
struct ResolutionPass<'a, L: ?Sized> {
    siblings: &'a L,
    stack: Vec<Frame<'a>>,
    visiting: HashSet<&'a str>,
    computed: HashMap<String, String>,
}

impl<'a, L> ResolutionPass<'a, L>
where
    L: HolderLookup + ?Sized,
{
    fn new(siblings: &'a L) -> Self {
        Self {
            siblings,
            stack: Vec::new(),
            visiting: HashSet::new(),
            computed: HashMap::new(),
        }
    }

    fn run(mut self, target: &'a DataHolder) -> DomainResult<String> {
        self.enter(target)?;

        while let Some(mut frame) = self.stack.pop() {
            let Some(reference) = frame.references.get(frame.next).cloned() else {
                let value = self.finish(frame)?;
                if self.stack.is_empty() {
                    return Ok(value);
                }
                continue;
            };
            frame.next += 1;
            let owner = frame.holder;
            self.stack.push(frame);

            if self.computed.contains_key(&reference) {
                continue;
            }
            let siblings: &'a L = self.siblings;
            let sibling = siblings
                .lookup(&reference)
                .ok_or_else(|| DomainError::UnresolvedReference {
                    holder: owner.name().to_string(),
                    reference: reference.clone(),
                })?;
            self.enter(sibling)?;
        }

        // Only reached when the target had nothing to evaluate.
        settled(target)
    }

    /// Pushes `holder` if it still needs evaluating.
    fn enter(&mut self, holder: &'a DataHolder) -> DomainResult<()> {
        let HolderValue::Unresolved { expression } = holder.state() else {
            return Ok(());
        };

        if self.visiting.contains(holder.name()) {
            let mut chain: Vec<String> = self
                .stack
                .iter()
                .map(|frame| frame.holder.name().to_string())
                .collect();
            chain.push(holder.name().to_string());
            return Err(DomainError::CyclicExpression { chain });
        }

        self.stack.push(Frame::open(holder, expression)?);
        self.visiting.insert(holder.name());
        Ok(())
    }

    /// Computes a frame whose references are all settled.
    fn finish(&mut self, frame: Frame<'a>) -> DomainResult<String> {
        self.visiting.remove(frame.holder.name());
        let siblings: &'a L = self.siblings;
        let computed = &self.computed;
        let value = frame.expression.evaluate(|reference| {
            if let Some(value) = computed.get(reference) {
                return Ok(value.clone());
            }
            siblings
                .lookup(reference)
                .ok_or_else(|| DomainError::UnresolvedReference {
                    holder: frame.holder.name().to_string(),
                    reference: reference.to_string(),
                })
                .and_then(settled)
        })?;

        let rendered = value.render();
        tracing::trace!(
            variable = frame.holder.name(),
            expression = frame.expression.source(),
            value = rendered.as_str(),
            "evaluated expression"
        );
        self.computed
            .insert(frame.holder.name().to_string(), rendered.clone());
        Ok(rendered)
    }
}

/// Returns the value of a holder that needs no evaluation.
fn settled(holder: &DataHolder) -> DomainResult<String> {
    match holder.state() {
        HolderValue::Literal { value } | HolderValue::Resolved { value, .. } => Ok(value.clone()),
        HolderValue::Unresolved { .. } => {
            Err(DomainError::UnresolvedExpression(holder.name().to_string()))
        }
    }
}

/// Computes the value of `holder`, evaluating referenced siblings on demand.
///
/// Siblings that are unresolved expressions are evaluated transiently and
/// left untouched.
pub(crate) fn evaluate_holder<L>(siblings: &L, holder: &DataHolder) -> DomainResult<String>
where
    L: HolderLookup + ?Sized,
{
    ResolutionPass::new(siblings).run(holder)
}
