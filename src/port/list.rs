//! Serial port enumeration.

use super::error::PortError;
use super::traits::{PortInfo, PortLister};
use serialport::SerialPortType;

/// Lists ports through `serialport::available_ports`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPortLister;

impl PortLister for SystemPortLister {
    fn list_ports(&self) -> Result<Vec<PortInfo>, PortError> {
        let ports =
            serialport::available_ports().map_err(|e| PortError::Enumeration(e.to_string()))?;

        Ok(ports
            .into_iter()
            .map(|p| {
                let info = PortInfo::new(p.port_name);
                match describe(&p.port_type) {
                    Some(desc) => info.with_description(desc),
                    None => info,
                }
            })
            .collect())
    }
}

fn describe(port_type: &SerialPortType) -> Option<String> {
    match port_type {
        SerialPortType::UsbPort(usb) => {
            let mut desc = format!("USB {:04x}:{:04x}", usb.vid, usb.pid);
            if let Some(ref product) = usb.product {
                desc.push(' ');
                desc.push_str(product);
            } else if let Some(ref manufacturer) = usb.manufacturer {
                desc.push(' ');
                desc.push_str(manufacturer);
            }
            Some(desc)
        }
        SerialPortType::BluetoothPort => Some("Bluetooth".to_string()),
        SerialPortType::PciPort => Some("PCI".to_string()),
        SerialPortType::Unknown => None,
    }
}

/// A fixed list of ports, for tests and `--port` overrides.
#[derive(Debug, Clone, Default)]
pub struct StaticPortLister {
    ports: Vec<PortInfo>,
}

impl StaticPortLister {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ports: names.into_iter().map(PortInfo::new).collect(),
        }
    }
}

impl PortLister for StaticPortLister {
    fn list_ports(&self) -> Result<Vec<PortInfo>, PortError> {
        Ok(self.ports.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_non_usb() {
        assert_eq!(describe(&SerialPortType::Unknown), None);
        assert_eq!(describe(&SerialPortType::PciPort).as_deref(), Some("PCI"));
        assert_eq!(
            describe(&SerialPortType::BluetoothPort).as_deref(),
            Some("Bluetooth")
        );
    }

    #[test]
    fn test_static_lister() {
        let lister = StaticPortLister::new(["COM3", "COM4"]);
        let ports = lister.list_ports().unwrap();
        assert_eq!(ports.len(), 2);
        assert_eq!(ports[1].name, "COM4");
    }
}
