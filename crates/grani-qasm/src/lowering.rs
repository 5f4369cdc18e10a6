//! Lowering from the AST to the circuit IR.
//!
//! Lowering is a pure function of the validated program: register
//! declarations allocate concrete registers, gate applications become
//! events, and user-defined gates expand recursively under an immutable
//! substitution context, so sibling expansions cannot leak bindings into
//! each other. The events land on the circuit's schedule in visitation
//! order, which is the program's textual order.

use rustc_hash::{FxHashMap, FxHashSet};

use grani_ir::{CbitId, Circuit, Event, GateOp, QubitId};

use crate::ast::{Argument, GateDecl, Program, Statement, StatementKind, UnitaryOp};
use crate::error::{QasmError, QasmResult};
use crate::registry::{GateBehavior, GateRegistry};

/// Lower a semantically valid program into a [`Circuit`].
pub fn lower(program: &Program, registry: &GateRegistry) -> QasmResult<Circuit> {
    let mut visitor = Lowering::new(program, registry);
    let mut circuit = Circuit::new("main");

    for statement in &program.statements {
        visitor.lower_statement(statement, &mut circuit)?;
    }
    Ok(circuit)
}

/// Substitution context for one gate expansion.
///
/// Cloned and extended per call, never shared mutably; the maps are the
/// formal→actual bindings of exactly one expansion frame.
#[derive(Debug, Clone, Default)]
struct Bindings {
    params: FxHashMap<String, f64>,
    qubits: FxHashMap<String, QubitId>,
}

impl Bindings {
    fn is_toplevel(&self) -> bool {
        self.qubits.is_empty() && self.params.is_empty()
    }
}

struct Lowering<'a> {
    registry: &'a GateRegistry,
    /// User gate declarations, collected up front so bodies can call
    /// gates by name during expansion.
    gates: FxHashMap<&'a str, &'a GateDecl>,
}

impl<'a> Lowering<'a> {
    fn new(program: &'a Program, registry: &'a GateRegistry) -> Self {
        let mut gates = FxHashMap::default();
        for statement in &program.statements {
            if let StatementKind::GateDecl(decl) = &statement.kind {
                gates.insert(decl.name.as_str(), decl);
            }
        }
        Lowering { registry, gates }
    }

    fn lower_statement(&mut self, statement: &Statement, circuit: &mut Circuit) -> QasmResult<()> {
        let pos = statement.pos;
        match &statement.kind {
            StatementKind::QregDecl { name, size } => circuit
                .add_qreg(name, *size)
                .map(|_| ())
                .map_err(|e| QasmError::semantic(pos, e.to_string())),
            StatementKind::CregDecl { name, size } => circuit
                .add_creg(name, *size)
                .map(|_| ())
                .map_err(|e| QasmError::semantic(pos, e.to_string())),
            // Declarations produce no events; applications expand them.
            StatementKind::GateDecl(_) | StatementKind::OpaqueDecl { .. } => Ok(()),
            StatementKind::Unitary(op) => {
                let mut events = Vec::new();
                self.lower_call(pos, op, circuit, &Bindings::default(), &mut events)?;
                for event in events {
                    circuit.append(event);
                }
                Ok(())
            }
            StatementKind::Measure { qubit, target } => {
                let qubits = resolve_qarg(circuit, qubit, &Bindings::default(), pos)?;
                let cbits = resolve_carg(circuit, target, pos)?;
                if qubits.len() != cbits.len() {
                    return Err(QasmError::semantic(
                        pos,
                        format!(
                            "measure maps {} qubit(s) onto {} classical bit(s)",
                            qubits.len(),
                            cbits.len()
                        ),
                    ));
                }
                for (q, c) in qubits.into_iter().zip(cbits) {
                    let event = Event::measurement([q], [c])
                        .map_err(|e| QasmError::semantic(pos, e.to_string()))?;
                    circuit.append(event);
                }
                Ok(())
            }
            StatementKind::Reset { qubit } => {
                let qubits = resolve_qarg(circuit, qubit, &Bindings::default(), pos)?;
                for q in qubits {
                    circuit.append(Event::reset([q]));
                }
                Ok(())
            }
            StatementKind::Barrier { qubits } => {
                let mut all = Vec::new();
                for arg in qubits {
                    all.extend(resolve_qarg(circuit, arg, &Bindings::default(), pos)?);
                }
                circuit.append(Event::barrier(all));
                Ok(())
            }
            StatementKind::If {
                register,
                value,
                body,
            } => {
                let creg = circuit.creg(register).ok_or_else(|| {
                    QasmError::semantic(pos, format!("classical register `{register}` not found"))
                })?;
                let cbits: Vec<CbitId> = creg.cbits().collect();

                // Lower the guarded statement into a staging circuit so
                // every event it expands to gets wrapped independently.
                let mut staged = circuit.clone();
                let before = staged.schedule().len();
                self.lower_statement(body, &mut staged)?;
                for event in staged.schedule().events()[before..].iter().cloned() {
                    circuit.append(Event::conditional(register.clone(), cbits.clone(), *value, event));
                }
                Ok(())
            }
        }
    }

    /// Lower one gate application (built-in, registry, or user-defined)
    /// into `out` under the given bindings.
    fn lower_call(
        &self,
        pos: usize,
        op: &UnitaryOp,
        circuit: &Circuit,
        bindings: &Bindings,
        out: &mut Vec<Event>,
    ) -> QasmResult<()> {
        let params: Vec<f64> = op
            .params
            .iter()
            .map(|e| e.eval(&bindings.params))
            .collect::<QasmResult<_>>()?;

        let lists: Vec<Vec<QubitId>> = op
            .args
            .iter()
            .map(|arg| resolve_qarg(circuit, arg, bindings, pos))
            .collect::<QasmResult<_>>()?;
        let positions = broadcast(&lists, pos)?;

        for qubits in positions {
            check_distinct(&qubits, pos)?;
            match op.name.as_str() {
                "U" => {
                    out.push(Event::gate(
                        GateOp::unitary(params[0], params[1], params[2]),
                        [qubits[0]],
                    ));
                }
                "CX" => {
                    out.push(Event::controlled(
                        GateOp::named("x"),
                        qubits[0],
                        [qubits[1]],
                    ));
                }
                name => {
                    if let Some(decl) = self.gates.get(name) {
                        self.expand_gate(pos, decl, &params, &qubits, circuit, out)?;
                    } else if let Some(spec) = self.registry.get(name) {
                        match &spec.behavior {
                            GateBehavior::Single => {
                                out.push(Event::gate(
                                    GateOp::with_params(name, params.clone()),
                                    qubits.clone(),
                                ));
                            }
                            GateBehavior::Controlled { base } => {
                                out.push(Event::controlled(
                                    GateOp::named(base.clone()),
                                    qubits[0],
                                    qubits[1..].iter().copied(),
                                ));
                            }
                        }
                    } else {
                        return Err(QasmError::semantic(
                            pos,
                            format!("gate `{name}` is not declared"),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Expand a user-defined gate body under fresh bindings.
    fn expand_gate(
        &self,
        pos: usize,
        decl: &GateDecl,
        params: &[f64],
        qubits: &[QubitId],
        circuit: &Circuit,
        out: &mut Vec<Event>,
    ) -> QasmResult<()> {
        if params.len() != decl.params.len() || qubits.len() != decl.qubits.len() {
            return Err(QasmError::semantic(
                pos,
                format!("argument count mismatch expanding gate `{}`", decl.name),
            ));
        }
        let bindings = Bindings {
            params: decl
                .params
                .iter()
                .cloned()
                .zip(params.iter().copied())
                .collect(),
            qubits: decl
                .qubits
                .iter()
                .cloned()
                .zip(qubits.iter().copied())
                .collect(),
        };

        for statement in &decl.body {
            match &statement.kind {
                StatementKind::Unitary(op) => {
                    self.lower_call(statement.pos, op, circuit, &bindings, out)?;
                }
                StatementKind::Barrier { qubits: args } => {
                    let mut all = Vec::new();
                    for arg in args {
                        all.extend(resolve_qarg(circuit, arg, &bindings, statement.pos)?);
                    }
                    out.push(Event::barrier(all));
                }
                _ => {
                    return Err(QasmError::semantic(
                        statement.pos,
                        format!("unexpected statement in body of gate `{}`", decl.name),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Resolve a quantum argument to the qubits it names.
///
/// Inside a gate expansion, arguments are formal names bound to single
/// qubits; at top level they resolve against the circuit's registers,
/// with a bare register name yielding all of its qubits.
fn resolve_qarg(
    circuit: &Circuit,
    arg: &Argument,
    bindings: &Bindings,
    pos: usize,
) -> QasmResult<Vec<QubitId>> {
    if !bindings.is_toplevel() {
        let qubit = bindings.qubits.get(&arg.register).ok_or_else(|| {
            QasmError::semantic(pos, format!("unbound formal argument `{}`", arg.register))
        })?;
        return Ok(vec![*qubit]);
    }
    match arg.index {
        Some(index) => circuit
            .qubit(&arg.register, index)
            .map(|q| vec![q])
            .map_err(|e| QasmError::semantic(pos, e.to_string())),
        None => {
            let reg = circuit.qreg(&arg.register).ok_or_else(|| {
                QasmError::semantic(
                    pos,
                    format!("quantum register `{}` not found", arg.register),
                )
            })?;
            Ok(reg.qubits().collect())
        }
    }
}

/// Resolve a classical argument to the bits it names.
fn resolve_carg(circuit: &Circuit, arg: &Argument, pos: usize) -> QasmResult<Vec<CbitId>> {
    match arg.index {
        Some(index) => circuit
            .cbit(&arg.register, index)
            .map(|c| vec![c])
            .map_err(|e| QasmError::semantic(pos, e.to_string())),
        None => {
            let reg = circuit.creg(&arg.register).ok_or_else(|| {
                QasmError::semantic(
                    pos,
                    format!("classical register `{}` not found", arg.register),
                )
            })?;
            Ok(reg.cbits().collect())
        }
    }
}

/// Zip-broadcast argument lists position-wise.
///
/// Every list must have length 1 or `n` (the maximum length); length-1
/// lists repeat. Returns one qubit tuple per emitted application.
fn broadcast(lists: &[Vec<QubitId>], pos: usize) -> QasmResult<Vec<Vec<QubitId>>> {
    let n = lists.iter().map(Vec::len).max().unwrap_or(0);
    for list in lists {
        if list.len() != 1 && list.len() != n {
            return Err(QasmError::semantic(
                pos,
                format!(
                    "argument length mismatch: register of size {} against size {n}",
                    list.len()
                ),
            ));
        }
    }
    Ok((0..n)
        .map(|i| {
            lists
                .iter()
                .map(|list| if list.len() == 1 { list[0] } else { list[i] })
                .collect()
        })
        .collect())
}

/// Reject an application naming the same qubit twice.
fn check_distinct(qubits: &[QubitId], pos: usize) -> QasmResult<()> {
    let mut seen = FxHashSet::default();
    for qubit in qubits {
        if !seen.insert(*qubit) {
            return Err(QasmError::semantic(
                pos,
                format!("duplicate qubit {qubit} in one application"),
            ));
        }
    }
    Ok(())
}
