//! The engine: shared runtime state behind every scope
//!
//! Holds the intrinsic prototypes, the standard globals, the embedder
//! options and the script call stack. Coercions live in [`coerce`], property
//! resolution in [`property`] and the native library in [`builtins`].

pub mod builtins;
pub mod coerce;
pub mod property;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use crate::config::EngineOptions;
use crate::error::{JsError, StackFrame};
use crate::platform::ConsoleProvider;
use crate::value::{
    Binding, CheapClone, ExoticObject, JsFunction, JsObject, JsObjectRef, JsString, JsValue,
    NativeFn, NativeFunction, PropertyDescriptor, new_object_ref,
};

pub use coerce::{PreferredType, number_to_string, string_to_number};

/// Native error families with their own prototype
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Error,
    TypeError,
    ReferenceError,
    RangeError,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Error => "Error",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::RangeError => "RangeError",
        }
    }
}

/// Shared runtime state
pub struct Engine {
    // Intrinsic prototypes
    pub object_prototype: JsObjectRef,
    pub function_prototype: JsObjectRef,
    pub array_prototype: JsObjectRef,
    pub string_prototype: JsObjectRef,
    pub number_prototype: JsObjectRef,
    pub boolean_prototype: JsObjectRef,
    pub error_prototype: JsObjectRef,
    pub type_error_prototype: JsObjectRef,
    pub reference_error_prototype: JsObjectRef,
    pub range_error_prototype: JsObjectRef,

    /// Standard globals copied into every global scope
    globals: Vec<(JsString, Binding)>,

    options: EngineOptions,

    /// Active script calls, outermost first
    call_stack: RefCell<Vec<StackFrame>>,

    /// Start of the current top-level execution (for timeout checking)
    execution_start: Cell<Option<Instant>>,
}

fn object_with_prototype(prototype: &JsObjectRef) -> JsObjectRef {
    new_object_ref(JsObject::with_prototype(prototype.cheap_clone()))
}

impl Engine {
    /// Create an engine with its prototypes and standard globals installed
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn new(options: EngineOptions) -> Rc<Self> {
        let object_prototype = new_object_ref(JsObject::new());
        let error_prototype = object_with_prototype(&object_prototype);

        let mut engine = Engine {
            function_prototype: object_with_prototype(&object_prototype),
            array_prototype: object_with_prototype(&object_prototype),
            string_prototype: object_with_prototype(&object_prototype),
            number_prototype: object_with_prototype(&object_prototype),
            boolean_prototype: object_with_prototype(&object_prototype),
            type_error_prototype: object_with_prototype(&error_prototype),
            reference_error_prototype: object_with_prototype(&error_prototype),
            range_error_prototype: object_with_prototype(&error_prototype),
            error_prototype,
            object_prototype,
            globals: Vec::new(),
            options,
            call_stack: RefCell::new(Vec::new()),
            execution_start: Cell::new(None),
        };
        builtins::init(&mut engine);

        tracing::debug!(
            globals = engine.globals.len(),
            max_call_depth = engine.options.max_call_depth,
            timeout_ms = engine.options.timeout_ms,
            "engine bootstrapped"
        );
        Rc::new(engine)
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn console(&self) -> &dyn ConsoleProvider {
        self.options.console.as_ref()
    }

    /// Standard global bindings, in installation order
    pub fn globals(&self) -> &[(JsString, Binding)] {
        &self.globals
    }

    pub(crate) fn add_global(&mut self, name: &str, value: JsValue) {
        self.globals.push((
            JsString::from(name),
            Binding {
                value,
                mutable: true,
            },
        ));
    }

    pub(crate) fn add_constant(&mut self, name: &str, value: JsValue) {
        self.globals.push((
            JsString::from(name),
            Binding {
                value,
                mutable: false,
            },
        ));
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Object creation
    // ═══════════════════════════════════════════════════════════════════════════

    /// Create a plain object inheriting from Object.prototype
    pub fn create_object(&self) -> JsObjectRef {
        object_with_prototype(&self.object_prototype)
    }

    /// Create an array-like object: Array.prototype, index properties and `length`
    pub fn create_array(&self, elements: Vec<JsValue>) -> JsObjectRef {
        let array = object_with_prototype(&self.array_prototype);
        {
            let mut arr = array.borrow_mut();
            let len = elements.len();
            for (i, elem) in elements.into_iter().enumerate() {
                arr.set_data(i.to_string(), elem);
            }
            arr.set_data("length", JsValue::Number(len as f64));
        }
        array
    }

    /// Bare function object: Function.prototype as proto and a `name`
    pub fn create_function(&self, func: JsFunction) -> JsObjectRef {
        let name = JsValue::from(func.name().unwrap_or(""));
        let mut object = JsObject::with_prototype(self.function_prototype.cheap_clone());
        object.exotic = ExoticObject::Function(func);
        object.define_property("name", PropertyDescriptor::data_readonly(name));
        new_object_ref(object)
    }

    /// Constructor-shaped function object
    ///
    /// Sets `result.prototype` to `prototype` (a fresh plain object when
    /// `None`) and points `prototype.constructor` back at the result.
    pub fn function_value(&self, func: JsFunction, prototype: Option<JsObjectRef>) -> JsObjectRef {
        let function = self.create_function(func);
        let prototype = prototype.unwrap_or_else(|| self.create_object());
        prototype
            .borrow_mut()
            .set_data("constructor", JsValue::Object(function.cheap_clone()));
        function
            .borrow_mut()
            .set_data("prototype", JsValue::Object(prototype));
        function
    }

    pub fn create_native_function(
        &self,
        name: &'static str,
        func: NativeFn,
        constructor: bool,
    ) -> JsObjectRef {
        self.create_function(JsFunction::Native(NativeFunction {
            name,
            func,
            constructor,
        }))
    }

    /// Native constructor wired to an intrinsic prototype
    pub fn create_native_constructor(
        &self,
        name: &'static str,
        func: NativeFn,
        prototype: &JsObjectRef,
    ) -> JsObjectRef {
        self.function_value(
            JsFunction::Native(NativeFunction {
                name,
                func,
                constructor: true,
            }),
            Some(prototype.cheap_clone()),
        )
    }

    /// Install a native method as a writable data property
    pub fn register_method(&self, obj: &JsObjectRef, name: &'static str, func: NativeFn) {
        let method = self.create_native_function(name, func, false);
        obj.borrow_mut().set_data(name, JsValue::Object(method));
    }

    pub fn error_prototype_for(&self, kind: ErrorKind) -> &JsObjectRef {
        match kind {
            ErrorKind::Error => &self.error_prototype,
            ErrorKind::TypeError => &self.type_error_prototype,
            ErrorKind::ReferenceError => &self.reference_error_prototype,
            ErrorKind::RangeError => &self.range_error_prototype,
        }
    }

    /// Create an error object carrying `message` and a captured `stack`
    pub fn create_error(&self, kind: ErrorKind, message: &str) -> JsObjectRef {
        let error = object_with_prototype(self.error_prototype_for(kind));
        let mut stack = format!("{}: {}", kind.name(), message);
        for frame in self.stack_trace() {
            stack.push('\n');
            stack.push_str(&frame.to_string());
        }
        {
            let mut err = error.borrow_mut();
            err.set_data("message", JsValue::from(message));
            err.set_data("stack", JsValue::from(stack));
        }
        error
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Functions
    // ═══════════════════════════════════════════════════════════════════════════

    /// Function-shaped: inherits directly from Function.prototype
    pub fn is_function(&self, obj: &JsObjectRef) -> bool {
        obj.borrow()
            .prototype
            .as_ref()
            .is_some_and(|proto| Rc::ptr_eq(proto, &self.function_prototype))
    }

    pub fn is_callable(&self, value: &JsValue) -> bool {
        match value {
            JsValue::Object(obj) => self.is_function(obj) && obj.borrow().is_callable(),
            _ => false,
        }
    }

    fn resolve_callable(&self, callee: &JsValue) -> Result<JsFunction, JsError> {
        let JsValue::Object(obj) = callee else {
            return Err(JsError::reference_error(format!(
                "{} is not a function",
                self.describe_value(callee)
            )));
        };
        let func = if self.is_function(obj) {
            obj.borrow().as_function().cloned()
        } else {
            None
        };
        func.ok_or_else(|| {
            JsError::type_error(format!("{} is not a function", self.describe_value(callee)))
        })
    }

    /// Invoke `callee` with an explicit receiver
    ///
    /// `new_target` is the object under construction when reached via `new`.
    pub fn execute_function(
        &self,
        callee: &JsValue,
        this: JsValue,
        args: &[JsValue],
        new_target: Option<&JsObjectRef>,
    ) -> Result<JsValue, JsError> {
        let func = self.resolve_callable(callee)?;
        if new_target.is_some() && !func.is_constructor() {
            return Err(JsError::type_error(format!(
                "{} is not a constructor",
                self.describe_value(callee)
            )));
        }

        let _frame = self.enter_call(&func)?;
        tracing::trace!(
            function = func.name().unwrap_or("<anonymous>"),
            depth = self.call_depth(),
            "call"
        );

        match &func {
            JsFunction::Interpreted(f) => f.invoke(this, args, new_target),
            JsFunction::Native(f) => (f.func)(self, this, args, new_target),
        }
    }

    fn require_constructor(&self, value: &JsValue) -> Result<JsObjectRef, JsError> {
        match value {
            JsValue::Object(obj)
                if self.is_function(obj)
                    && obj.borrow().as_function().is_some_and(JsFunction::is_constructor) =>
            {
                Ok(obj.cheap_clone())
            }
            _ => Err(JsError::type_error(format!(
                "{} is not a constructor",
                self.describe_value(value)
            ))),
        }
    }

    /// `new constructor(...args)`
    ///
    /// The fresh object's prototype comes from `new_target.prototype`
    /// (defaulting to `constructor`), falling back to Object.prototype when
    /// that is not an object. An object returned by the constructor replaces
    /// the fresh one.
    pub fn construct_object(
        &self,
        constructor: &JsValue,
        args: &[JsValue],
        new_target: Option<&JsValue>,
    ) -> Result<JsObjectRef, JsError> {
        let ctor = self.require_constructor(constructor)?;
        let target = match new_target {
            Some(target) => self.require_constructor(target)?,
            None => ctor,
        };

        let receiver = JsValue::Object(target.cheap_clone());
        let prototype = match self.read_property(&target, "prototype", &receiver)? {
            JsValue::Object(proto) => proto,
            _ => self.object_prototype.cheap_clone(),
        };

        let this_obj = object_with_prototype(&prototype);
        let result = self.execute_function(
            constructor,
            JsValue::Object(this_obj.cheap_clone()),
            args,
            Some(&this_obj),
        )?;

        match result {
            JsValue::Object(obj) => Ok(obj),
            _ => Ok(this_obj),
        }
    }

    /// `value instanceof constructor`
    ///
    /// Only the immediate prototype of `value` is compared against
    /// `constructor.prototype`.
    pub fn is_instance_of(&self, value: &JsValue, constructor: &JsValue) -> Result<bool, JsError> {
        let ctor = match constructor {
            JsValue::Object(obj) if self.is_callable(constructor) => obj,
            _ => {
                return Err(JsError::type_error(
                    "Right-hand side of 'instanceof' is not callable",
                ));
            }
        };
        let JsValue::Object(obj) = value else {
            return Ok(false);
        };

        let JsValue::Object(prototype) = self.read_property(ctor, "prototype", constructor)? else {
            return Err(JsError::type_error(
                "Function has non-object prototype in instanceof check",
            ));
        };
        let actual = obj.borrow().prototype.clone();
        Ok(actual.is_some_and(|p| Rc::ptr_eq(&p, &prototype)))
    }

    /// `key in target`, consulting the whole prototype chain
    pub fn is_in(&self, key: &JsValue, target: &JsValue) -> Result<bool, JsError> {
        let key = match key {
            JsValue::String(s) => s.cheap_clone(),
            JsValue::Number(_) => self.to_property_key(key)?,
            _ => {
                return Err(JsError::type_error(format!(
                    "Cannot use 'in' operator with key {}",
                    self.describe_value(key)
                )));
            }
        };
        let JsValue::Object(obj) = target else {
            return Err(JsError::type_error(format!(
                "Cannot use 'in' operator to search for '{}' in {}",
                key,
                self.describe_value(target)
            )));
        };
        Ok(self.get_property_descriptor(obj, &key).is_some())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Call stack and timeout
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn call_depth(&self) -> usize {
        self.call_stack.borrow().len()
    }

    /// Active frames, innermost first
    pub fn stack_trace(&self) -> Vec<StackFrame> {
        self.call_stack.borrow().iter().rev().cloned().collect()
    }

    fn enter_call(&self, func: &JsFunction) -> Result<CallFrameGuard<'_>, JsError> {
        self.check_timeout()?;

        let mut stack = self.call_stack.borrow_mut();
        if stack.len() >= self.options.max_call_depth {
            return Err(JsError::range_error("Maximum call stack size exceeded"));
        }
        let loc = func.location();
        stack.push(StackFrame {
            function_name: func.name().map(str::to_string),
            line: loc.map(|l| l.start.line),
            column: loc.map(|l| l.start.column),
        });
        Ok(CallFrameGuard { engine: self })
    }

    /// Start the timeout clock, unless a script call is already running
    pub(crate) fn begin_execution(&self) {
        if self.call_depth() == 0 {
            self.execution_start.set(Some(Instant::now()));
        }
    }

    /// Fail with [`JsError::Timeout`] once the configured budget is spent
    ///
    /// A `timeout_ms` of 0 disables the check.
    pub fn check_timeout(&self) -> Result<(), JsError> {
        let timeout_ms = self.options.timeout_ms;
        if timeout_ms == 0 {
            return Ok(());
        }

        if let Some(start) = self.execution_start.get() {
            let elapsed_ms = start.elapsed().as_millis() as u64;
            if elapsed_ms > timeout_ms {
                return Err(JsError::Timeout {
                    timeout_ms,
                    elapsed_ms,
                });
            }
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Error routing
    // ═══════════════════════════════════════════════════════════════════════════

    /// Wrap a script value for `throw`
    ///
    /// The description is side-effect free here; script `toString` only runs
    /// once the error escapes the program (see [`Engine::render_uncaught`]).
    pub fn throw_value(&self, value: JsValue) -> JsError {
        JsError::Thrown {
            description: self.describe_value(&value),
            value,
            stack: self.stack_trace(),
        }
    }

    /// Re-render the description of an uncaught thrown value with `to_string`
    ///
    /// Failures keep the description computed at the throw site.
    pub(crate) fn render_uncaught(&self, err: JsError) -> JsError {
        match err {
            JsError::Thrown {
                value,
                description,
                stack,
            } => {
                let description = match self.to_string(&value) {
                    Ok(rendered) => rendered.to_string(),
                    Err(render_err) => {
                        tracing::debug!(error = %render_err, "uncaught value could not be stringified");
                        description
                    }
                };
                JsError::Thrown {
                    value,
                    description,
                    stack,
                }
            }
            other => other,
        }
    }

    /// Internal fault for syntax the evaluator does not implement
    pub fn unsupported(&self, what: impl fmt::Display) -> JsError {
        self.internal_error(format!("Unsupported syntax: {}", what))
    }

    pub fn internal_error(&self, message: impl Into<String>) -> JsError {
        JsError::Internal {
            message: message.into(),
            stack: self.stack_trace(),
        }
    }

    /// The script-visible value a `catch` clause binds for `err`
    ///
    /// Native faults materialize as error objects of the matching family.
    /// Internal faults and timeouts have no script value.
    pub fn error_to_value(&self, err: &JsError) -> Option<JsValue> {
        let (kind, message) = match err {
            JsError::Thrown { value, .. } => return Some(value.clone()),
            JsError::TypeError { message } => (ErrorKind::TypeError, message),
            JsError::ReferenceError { message } => (ErrorKind::ReferenceError, message),
            JsError::RangeError { message } => (ErrorKind::RangeError, message),
            JsError::Internal { .. } | JsError::Timeout { .. } | JsError::InvalidTree(_) => {
                return None;
            }
        };
        Some(JsValue::Object(self.create_error(kind, message)))
    }

    /// Side-effect free rendering used in error messages
    pub fn describe_value(&self, value: &JsValue) -> String {
        match value {
            JsValue::String(s) => format!("\"{}\"", s),
            JsValue::Object(obj) => {
                let obj = obj.borrow();
                match &obj.exotic {
                    ExoticObject::Function(func) => {
                        format!("function {}", func.name().unwrap_or("<anonymous>"))
                    }
                    ExoticObject::Primitive(inner) => {
                        format!("[object {}]", coerce::primitive_class(inner))
                    }
                    ExoticObject::Ordinary | ExoticObject::Host(_) => "[object Object]".to_string(),
                }
            }
            primitive => coerce::primitive_to_string(primitive).to_string(),
        }
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("globals", &self.globals.len())
            .field("options", &self.options)
            .field("call_depth", &self.call_depth())
            .finish_non_exhaustive()
    }
}

/// Pops the frame pushed by `enter_call` when the call unwinds
struct CallFrameGuard<'a> {
    engine: &'a Engine,
}

impl Drop for CallFrameGuard<'_> {
    fn drop(&mut self) {
        self.engine.call_stack.borrow_mut().pop();
    }
}
