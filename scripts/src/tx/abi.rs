use alloy::sol;

sol! {
#[sol(rpc)]
interface ILaunchToken {
    function name() external view returns (string memory);

    function symbol() external view returns (string memory);

    function decimals() external view returns (uint8);

    function totalSupply() external view returns (uint256);

    function balanceOf(address account) external view returns (uint256);

    function owner() external view returns (address);

    function tradingOpen() external view returns (bool);

    function transfer(address recipient, uint256 amount) external returns (bool);

    function openTrading() external;

    function removeLimit() external;

    function removeTransferTax() external;

    function renounceOwnership() external;
}

}
