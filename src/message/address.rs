/// The address of a controller on the network.
///
/// Sources and destinations share the same numbering: 0 is broadcast, 1 is the
/// prime controller, 2 is the base system controller, and 3 and above are
/// module controllers, starting with the lowest one. 0 is also used as a
/// source when a controller does not know its own address yet.
///
/// ```
/// # use grobot_msg::message::Address;
/// assert_eq!(Address::from(2), Address::BaseSystem);
/// assert_eq!(Address::from(4).module_index(), Some(1));
/// assert_eq!(u8::from(Address::Prime), 1);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Address {
	/// Every controller (or an unknown source).
	Broadcast,
	/// The prime controller.
	Prime,
	/// The base system controller.
	BaseSystem,
	/// A module controller. The value is the raw address, which is at least 3.
	Module(u8),
}

impl Address {
	/// The address of the first (lowest) module controller.
	pub const FIRST_MODULE: u8 = 3;

	/// The module's position in the stack, counting from 0 at the lowest one.
	///
	/// Returns `None` if this is not a module controller, or if it was built
	/// by hand from an address below [`FIRST_MODULE`](Address::FIRST_MODULE).
	pub fn module_index(self) -> Option<u8> {
		match self {
			Address::Module(address) => address.checked_sub(Address::FIRST_MODULE),
			_ => None,
		}
	}

	/// Whether the address targets every controller.
	pub fn is_broadcast(self) -> bool {
		self == Address::Broadcast
	}
}

impl From<u8> for Address {
	fn from(address: u8) -> Self {
		match address {
			0 => Address::Broadcast,
			1 => Address::Prime,
			2 => Address::BaseSystem,
			n => Address::Module(n),
		}
	}
}

impl From<Address> for u8 {
	fn from(address: Address) -> Self {
		match address {
			Address::Broadcast => 0,
			Address::Prime => 1,
			Address::BaseSystem => 2,
			Address::Module(n) => n,
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn classification() {
		struct Case {
			raw: u8,
			address: Address,
			module_index: Option<u8>,
		}

		let cases = &[
			Case {
				raw: 0,
				address: Address::Broadcast,
				module_index: None,
			},
			Case {
				raw: 1,
				address: Address::Prime,
				module_index: None,
			},
			Case {
				raw: 2,
				address: Address::BaseSystem,
				module_index: None,
			},
			Case {
				raw: 3,
				address: Address::Module(3),
				module_index: Some(0),
			},
			Case {
				raw: 255,
				address: Address::Module(255),
				module_index: Some(252),
			},
		];

		for case in cases {
			let address = Address::from(case.raw);
			assert_eq!(address, case.address, "address {}", case.raw);
			assert_eq!(address.module_index(), case.module_index);
			assert_eq!(u8::from(address), case.raw);
		}
		assert!(Address::from(0).is_broadcast());
		assert!(!Address::from(1).is_broadcast());
	}
}
