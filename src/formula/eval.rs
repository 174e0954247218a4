use super::ast::*;
use super::{EResult, EvalError, Value};
use crate::common::*;
use crate::context::Context;

impl Evaluate for Literal {
    fn evaluate(&self, _ctx: &Context) -> EResult<Value> {
        Ok(match *self {
            Literal::Int(x) => Value::Int(x),
            Literal::Bool(b) => Value::Bool(b),
        })
    }
}

impl Evaluate for Symbol {
    fn evaluate(&self, ctx: &Context) -> EResult<Value> {
        match ctx.get(&self.name) {
            Some(value) => Ok(value.clone()),
            None if Function::from_name(&self.name).is_some() => {
                Err(EvalError::NotAValue(self.name.clone()))
            }
            None => Err(EvalError::Unbound(self.name.clone())),
        }
    }
}

impl Evaluate for Unary {
    fn evaluate(&self, ctx: &Context) -> EResult<Value> {
        let value = self.value.evaluate(ctx)?;
        if self.op == UnaryOperator::Not {
            return Ok(Value::Bool(!value.truthy()));
        }

        let x = value
            .as_int()
            .ok_or_else(|| EvalError::bad_operand(format_args!("unary {}", self.op), &value))?;
        Ok(Value::Int(match self.op {
            UnaryOperator::Neg => x.checked_neg().ok_or(EvalError::Overflow)?,
            _ => x,
        }))
    }
}

impl Evaluate for Binary {
    fn evaluate(&self, ctx: &Context) -> EResult<Value> {
        use BinaryOperator::*;

        let left = self.left.evaluate(ctx)?;
        let right = self.right.evaluate(ctx)?;
        let (x, y) = match (left.as_int(), right.as_int()) {
            (Some(x), Some(y)) => (x, y),
            _ => return Err(EvalError::type_mismatch(self.op, &left, &right)),
        };

        let n = match self.op {
            Add => x.checked_add(y).ok_or(EvalError::Overflow)?,
            Sub => x.checked_sub(y).ok_or(EvalError::Overflow)?,
            Mul => x.checked_mul(y).ok_or(EvalError::Overflow)?,
            // Both spellings of division are floor division on integers.
            Div | Flr => floor_div(x, y)?,
            Rem => floor_mod(x, y)?,
        };
        Ok(Value::Int(n))
    }
}

impl Evaluate for Compare {
    fn evaluate(&self, ctx: &Context) -> EResult<Value> {
        let mut left = self.first.evaluate(ctx)?;
        for (op, node) in &self.rest {
            let right = node.evaluate(ctx)?;
            if !compare(*op, &left, &right)? {
                return Ok(Value::Bool(false));
            }
            left = right;
        }
        Ok(Value::Bool(true))
    }
}

fn compare(op: CompareOperator, left: &Value, right: &Value) -> EResult<bool> {
    use std::cmp::Ordering::*;
    use CompareOperator::*;

    Ok(match op {
        Eq => left.loose_eq(right),
        Ne => !left.loose_eq(right),
        Lt => left.ordering(right, op)? == Less,
        Gt => left.ordering(right, op)? == Greater,
        Le => left.ordering(right, op)? != Greater,
        Ge => left.ordering(right, op)? != Less,
    })
}

impl Evaluate for Logical {
    fn evaluate(&self, ctx: &Context) -> EResult<Value> {
        let left = self.left.evaluate(ctx)?;
        match (self.op, left.truthy()) {
            (LogicalOperator::And, false) | (LogicalOperator::Or, true) => Ok(left),
            _ => self.right.evaluate(ctx),
        }
    }
}

impl Evaluate for Conditional {
    fn evaluate(&self, ctx: &Context) -> EResult<Value> {
        if self.test.evaluate(ctx)?.truthy() {
            self.body.evaluate(ctx)
        } else {
            self.orelse.evaluate(ctx)
        }
    }
}

impl Evaluate for Call {
    fn evaluate(&self, ctx: &Context) -> EResult<Value> {
        let function = match self.function {
            Some(function) => function,
            None if ctx.get(&self.name).is_some() => {
                return Err(EvalError::NotCallable(self.name.clone()))
            }
            None => return Err(EvalError::Unbound(self.name.clone())),
        };

        let args = self
            .args
            .iter()
            .map(|arg| {
                let value = arg.evaluate(ctx)?;
                value
                    .as_int()
                    .ok_or_else(|| EvalError::bad_operand(format_args!("{}()", function), &value))
            })
            .collect::<EResult<Vec<Int>>>()?;

        call(function, &args).map(Value::Int)
    }
}

fn call(function: Function, args: &[Int]) -> EResult<Int> {
    let arity = |expected| EvalError::Arity {
        function,
        expected,
        found: args.len(),
    };

    match (function, args) {
        (Function::Abs, &[x]) => x.checked_abs().ok_or(EvalError::Overflow),
        (Function::Ceil | Function::Floor, &[x]) => Ok(x),
        (Function::Abs | Function::Ceil | Function::Floor, _) => Err(arity("1")),
        (Function::Min, [_, _, ..]) => Ok(args.iter().copied().min().unwrap_or_default()),
        (Function::Max, [_, _, ..]) => Ok(args.iter().copied().max().unwrap_or_default()),
        (Function::Min | Function::Max, _) => Err(arity("at least 2")),
        (Function::Round, &[x]) => Ok(x),
        (Function::Round, &[x, ndigits]) => round_to(x, ndigits),
        (Function::Round, _) => Err(arity("1 or 2")),
    }
}

/// `round(x, ndigits)` on an integer: a no-op for `ndigits >= 0`, otherwise
/// rounds to a multiple of `10^-ndigits` with ties going to the even multiple.
fn round_to(x: Int, ndigits: Int) -> EResult<Int> {
    if ndigits >= 0 {
        return Ok(x);
    }
    let exp = u32::try_from(ndigits.unsigned_abs()).unwrap_or(u32::MAX);
    let step = match 10i128.checked_pow(exp) {
        Some(step) => step,
        None => return Ok(0),
    };

    let x = x as i128;
    let q = x.div_euclid(step);
    let r = x.rem_euclid(step);
    let q = match r.cmp(&(step - r)) {
        std::cmp::Ordering::Greater => q + 1,
        std::cmp::Ordering::Equal if q % 2 != 0 => q + 1,
        _ => q,
    };
    Int::try_from(q * step).map_err(|_| EvalError::Overflow)
}
